//! Guess feedback calculation and representation
//!
//! Feedback is one [`Mark`] per letter position:
//! - `Absent`  (letter not in the target, or all its copies already claimed)
//! - `Present` (letter in the target, wrong position)
//! - `Correct` (letter in the correct position)
//!
//! Marks are ordered `Absent < Present < Correct`, which lets letter knowledge
//! be accumulated by taking the maximum.

use super::Word;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a single guessed letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Absent,
    Present,
    Correct,
}

impl Mark {
    /// Single-character code used in text patterns
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent => '-',
        }
    }

    /// Emoji square for this mark
    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

/// Error returned when a feedback string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid feedback string: {0}")]
pub struct FeedbackParseError(pub String);

/// Positional feedback for one guess
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feedback(Vec<Mark>);

impl Feedback {
    /// Calculate the feedback when `guess` is played against `target`
    ///
    /// Implements the two-pass rule that handles duplicate letters:
    /// 1. Exact position matches are marked `Correct` and consume that
    ///    target position.
    /// 2. Each remaining guess letter claims the leftmost unconsumed target
    ///    position holding the same letter (`Present`), or is `Absent`.
    ///
    /// A letter occurring k times in the target is therefore reported as
    /// `Correct`/`Present` at most k times.
    ///
    /// Both words are expected to have the same length; extra positions of
    /// the longer word are ignored.
    ///
    /// # Examples
    /// ```
    /// use wordlik::core::{Feedback, Mark, Word};
    ///
    /// let guess = Word::new("aabcd").unwrap();
    /// let target = Word::new("mamka").unwrap();
    /// let feedback = Feedback::calculate(&guess, &target);
    ///
    /// assert_eq!(
    ///     feedback.marks(),
    ///     &[Mark::Present, Mark::Correct, Mark::Absent, Mark::Absent, Mark::Absent]
    /// );
    /// ```
    #[must_use]
    // Allow: index needed to address guess[i], target[i] and both consumed arrays
    #[allow(clippy::needless_range_loop)]
    pub fn calculate(guess: &Word, target: &Word) -> Self {
        debug_assert_eq!(guess.len(), target.len(), "words must have equal length");

        let guess = guess.letters();
        let target = target.letters();
        let len = guess.len().min(target.len());

        let mut marks = vec![Mark::Absent; len];
        let mut target_used = vec![false; len];
        let mut guess_used = vec![false; len];

        // First pass: exact matches
        for i in 0..len {
            if guess[i] == target[i] {
                marks[i] = Mark::Correct;
                target_used[i] = true;
                guess_used[i] = true;
            }
        }

        // Second pass: leftmost unconsumed occurrence elsewhere
        for i in 0..len {
            if guess_used[i] {
                continue;
            }
            if let Some(j) = (0..len).find(|&j| !target_used[j] && target[j] == guess[i]) {
                marks[i] = Mark::Present;
                target_used[j] = true;
            }
        }

        Self(marks)
    }

    /// Build feedback from explicit marks
    #[must_use]
    pub fn from_marks(marks: Vec<Mark>) -> Self {
        Self(marks)
    }

    /// Per-position marks
    #[inline]
    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        &self.0
    }

    /// Number of positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if every position is `Correct`
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&m| m == Mark::Correct)
    }

    /// Count positions carrying the given mark
    #[must_use]
    pub fn count(&self, mark: Mark) -> usize {
        self.0.iter().filter(|&&m| m == mark).count()
    }

    #[must_use]
    pub fn count_correct(&self) -> usize {
        self.count(Mark::Correct)
    }

    #[must_use]
    pub fn count_present(&self) -> usize {
        self.count(Mark::Present)
    }

    #[must_use]
    pub fn count_absent(&self) -> usize {
        self.count(Mark::Absent)
    }

    /// Indices of positions carrying the given mark
    #[must_use]
    pub fn positions(&self, mark: Mark) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| (m == mark).then_some(i))
            .collect()
    }

    /// Accuracy score in percent: a correct letter counts 1, a present letter 0.5
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let score = self.count_correct() as f64 + self.count_present() as f64 * 0.5;
        score / self.0.len() as f64 * 100.0
    }

    /// Whether `candidate` as the target would have produced this feedback for `guess`
    #[must_use]
    pub fn is_consistent(&self, guess: &Word, candidate: &Word) -> bool {
        candidate.len() == self.len() && Self::calculate(guess, candidate) == *self
    }

    /// Parse feedback from a string like "GY-GY" or "🟩🟨⬜🟩🟨"
    ///
    /// Accepts:
    /// - 'G'/'g'/🟩 for correct
    /// - 'Y'/'y'/🟨 for present
    /// - '-'/'_'/⬜ for absent
    ///
    /// # Errors
    /// Returns `FeedbackParseError` for an empty string or an unknown symbol.
    ///
    /// # Examples
    /// ```
    /// use wordlik::core::Feedback;
    ///
    /// let p1 = Feedback::parse("GY-GY").unwrap();
    /// let p2 = Feedback::parse("🟩🟨⬜🟩🟨").unwrap();
    /// assert_eq!(p1, p2);
    /// ```
    pub fn parse(s: &str) -> Result<Self, FeedbackParseError> {
        let marks = s
            .chars()
            .map(|ch| match ch {
                'G' | 'g' | '🟩' => Ok(Mark::Correct),
                'Y' | 'y' | '🟨' => Ok(Mark::Present),
                '-' | '_' | '⬜' => Ok(Mark::Absent),
                _ => Err(FeedbackParseError(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if marks.is_empty() {
            return Err(FeedbackParseError(s.to_string()));
        }
        Ok(Self(marks))
    }

    /// Convert feedback to an emoji string
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|m| m.emoji()).collect()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mark in &self.0 {
            write!(f, "{}", mark.code())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Feedback {
    type Err = FeedbackParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
