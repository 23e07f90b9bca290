//! Results and errors of a single guess

use super::GameStatus;
use crate::core::{Feedback, Word};
use serde::Serialize;
use thiserror::Error;

/// Why a guess was rejected
///
/// A rejected guess never changes the game state and never counts as an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("Game is already finished")]
    AlreadyFinished,
    #[error("Word must have exactly {expected} letters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("'{0}' is not in the word list")]
    InvalidWord(String),
    #[error("'{0}' was already guessed")]
    AlreadyGuessed(String),
}

/// One accepted guess and its feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRecord {
    pub word: Word,
    pub feedback: Feedback,
}

/// Result of an accepted guess
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessOutcome {
    /// The normalised guess
    pub word: String,
    pub feedback: Feedback,
    /// 1-based number of this attempt
    pub attempt_number: u32,
    pub attempts_remaining: u32,
    pub status: GameStatus,
    /// Revealed only once the game is over
    pub target: Option<String>,
}

impl GuessOutcome {
    #[must_use]
    pub fn is_winning(&self) -> bool {
        self.status == GameStatus::Won
    }

    /// Whether this guess ended the game
    #[must_use]
    pub fn is_game_ending(&self) -> bool {
        self.status.is_terminal()
    }
}
