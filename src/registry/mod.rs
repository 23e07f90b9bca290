//! Concurrent session registry
//!
//! [`SessionRegistry`] maps each participant to at most one live
//! [`GameState`](crate::game::GameState). It owns session creation and
//! teardown, admission control, target word selection and the process-wide
//! counters. Access is serialised per participant; different participants
//! proceed in parallel.

mod clock;
mod counters;
mod session_registry;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counters::RegistryStats;
pub(crate) use counters::divide;
pub use session_registry::{
    DEFAULT_MAX_SESSIONS, DEFAULT_RECENT_WORDS, RegistryConfig, SessionRegistry,
    WORD_SELECTION_RETRIES,
};

use crate::core::WordError;
use crate::game::{GameStatus, GuessError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Stable identity of a participant, the sole registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Why a registry operation was refused
///
/// None of these leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{0} already has an active game")]
    AlreadyActive(ParticipantId),
    #[error("Session limit of {limit} reached")]
    CapacityExceeded { limit: usize },
    #[error("{0} has no active game")]
    NoActiveSession(ParticipantId),
    #[error("Game of {0} is paused")]
    SessionPaused(ParticipantId),
    #[error("Word provider returned unusable target '{word}': {source}")]
    InvalidTarget {
        word: String,
        #[source]
        source: WordError,
    },
    #[error(transparent)]
    Guess(#[from] GuessError),
}

/// How a retired session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Won,
    Lost,
    /// Ended before reaching a terminal state (abandon request or idle sweep)
    Abandoned,
}

impl From<GameStatus> for SessionOutcome {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Won => Self::Won,
            GameStatus::Lost => Self::Lost,
            GameStatus::InProgress => Self::Abandoned,
        }
    }
}

/// Record of a retired session, handed to the stats store by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub participant: ParticipantId,
    pub target: String,
    pub attempts_used: u32,
    pub max_attempts: u32,
    pub play_duration: Duration,
    pub outcome: SessionOutcome,
    #[serde(default)]
    pub hints_used: u32,
}

impl SessionSummary {
    /// Attempts needed, only for won games
    #[must_use]
    pub fn winning_attempts(&self) -> Option<u32> {
        (self.outcome == SessionOutcome::Won).then_some(self.attempts_used)
    }
}

/// Read-only view of a live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub participant: ParticipantId,
    pub status: GameStatus,
    pub paused: bool,
    pub word_length: usize,
    pub attempts_used: u32,
    pub attempts_remaining: u32,
    pub max_attempts: u32,
    pub guesses: Vec<String>,
    pub elapsed: Duration,
    /// Revealed only once the game is over
    pub target: Option<String>,
}

impl SessionInfo {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}
