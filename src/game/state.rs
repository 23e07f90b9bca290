//! Game state machine for a single session

use super::{GuessError, GuessOutcome, GuessRecord};
use crate::core::{Feedback, Mark, Word};
use crate::wordlists::WordProvider;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// Attempts allowed when none are configured
pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::new(6).unwrap();

/// Lifecycle status of a game
///
/// `Won` and `Lost` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// State of one participant's game
#[derive(Debug, Clone)]
pub struct GameState {
    target: Word,
    max_attempts: u32,
    attempts_used: u32,
    guessed: FxHashSet<String>,
    history: Vec<GuessRecord>,
    knowledge: FxHashMap<char, Mark>,
    status: GameStatus,
    created_at: Instant,
}

impl GameState {
    /// Start a game with the default number of attempts
    #[must_use]
    pub fn new(target: Word, created_at: Instant) -> Self {
        Self::with_max_attempts(target, DEFAULT_MAX_ATTEMPTS, created_at)
    }

    /// Start a game allowing `max_attempts` accepted guesses
    #[must_use]
    pub fn with_max_attempts(target: Word, max_attempts: NonZeroU32, created_at: Instant) -> Self {
        Self {
            target,
            max_attempts: max_attempts.get(),
            attempts_used: 0,
            guessed: FxHashSet::default(),
            history: Vec::new(),
            knowledge: FxHashMap::default(),
            status: GameStatus::InProgress,
            created_at,
        }
    }

    /// Submit a guess
    ///
    /// The input is trimmed and lowercased. Checks run in order: finished game,
    /// length, vocabulary, repeat. A rejected guess leaves the state untouched.
    ///
    /// # Errors
    /// Returns the first `GuessError` that applies.
    ///
    /// # Examples
    /// ```
    /// use std::time::Instant;
    /// use wordlik::core::Word;
    /// use wordlik::game::{GameState, GameStatus};
    /// use wordlik::wordlists::WordList;
    ///
    /// let words = WordList::new(["kocka", "dlaha"], 5).unwrap();
    /// let mut game = GameState::new(Word::new("kocka").unwrap(), Instant::now());
    ///
    /// let outcome = game.submit_guess("kocka", &words).unwrap();
    /// assert_eq!(outcome.status, GameStatus::Won);
    /// assert_eq!(outcome.target.as_deref(), Some("kocka"));
    /// ```
    pub fn submit_guess<P>(&mut self, input: &str, words: &P) -> Result<GuessOutcome, GuessError>
    where
        P: WordProvider + ?Sized,
    {
        if self.status.is_terminal() {
            return Err(GuessError::AlreadyFinished);
        }

        let normalized = input.trim().to_lowercase();

        let actual = normalized.chars().count();
        if actual != self.target.len() {
            return Err(GuessError::InvalidLength {
                expected: self.target.len(),
                actual,
            });
        }

        if !words.is_valid(&normalized) {
            return Err(GuessError::InvalidWord(normalized));
        }

        if self.guessed.contains(&normalized) {
            return Err(GuessError::AlreadyGuessed(normalized));
        }

        let guess = Word::new(&normalized).map_err(|_| GuessError::InvalidWord(normalized))?;
        Ok(self.apply(guess))
    }

    fn apply(&mut self, guess: Word) -> GuessOutcome {
        let feedback = Feedback::calculate(&guess, &self.target);

        self.attempts_used += 1;
        self.guessed.insert(guess.text().to_string());

        for (&letter, &mark) in guess.letters().iter().zip(feedback.marks()) {
            let known = self.knowledge.entry(letter).or_insert(mark);
            *known = (*known).max(mark);
        }

        // Win beats running out on the same attempt
        self.status = if guess == self.target {
            GameStatus::Won
        } else if self.attempts_used >= self.max_attempts {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };

        let outcome = GuessOutcome {
            word: guess.text().to_string(),
            feedback: feedback.clone(),
            attempt_number: self.attempts_used,
            attempts_remaining: self.attempts_remaining(),
            status: self.status,
            target: self.target_word().map(str::to_string),
        };

        self.history.push(GuessRecord {
            word: guess,
            feedback,
        });

        outcome
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn has_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    #[must_use]
    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts - self.attempts_used
    }

    /// Letter count of the target
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.target.len()
    }

    /// The target word, revealed only once the game is over
    #[must_use]
    pub fn target_word(&self) -> Option<&str> {
        self.status.is_terminal().then(|| self.target.text())
    }

    /// The target regardless of status, for the registry's teardown summary
    pub(crate) fn secret_target(&self) -> &str {
        self.target.text()
    }

    /// Accepted guesses with their feedback, oldest first
    #[must_use]
    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    /// Accepted guess words, oldest first
    #[must_use]
    pub fn guesses(&self) -> Vec<String> {
        self.history
            .iter()
            .map(|record| record.word.text().to_string())
            .collect()
    }

    #[must_use]
    pub fn has_guessed(&self, word: &str) -> bool {
        self.guessed.contains(&word.trim().to_lowercase())
    }

    /// Best mark seen so far for every guessed letter
    #[must_use]
    pub fn letter_knowledge(&self) -> &FxHashMap<char, Mark> {
        &self.knowledge
    }

    /// Best mark seen for `letter`; `None` if it was never guessed
    #[must_use]
    pub fn knowledge_of(&self, letter: char) -> Option<Mark> {
        self.knowledge.get(&letter).copied()
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Time since the game was created, as seen at `now`
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}
