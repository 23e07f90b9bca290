//! Per-participant statistics
//!
//! The engine only emits [`SessionSummary`] values; keeping durable
//! per-participant aggregates is the job of a [`StatsStore`]. The in-memory
//! store here can snapshot itself to JSON.

use crate::registry::{ParticipantId, SessionOutcome, SessionSummary};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Consumer of finished sessions
pub trait StatsStore: Send + Sync {
    fn record(&self, summary: &SessionSummary);

    fn player(&self, participant: &ParticipantId) -> Option<PlayerStats>;
}

/// Error type for stats persistence
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Stats file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stats file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lifetime statistics of one participant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub games_played: u64,
    pub games_won: u64,
    pub current_streak: u64,
    pub best_streak: u64,
    /// Attempts summed over won games
    pub total_attempts: u64,
    pub total_play_time: Duration,
    pub hints_used: u64,
    /// Won games keyed by attempts needed
    pub attempts_distribution: BTreeMap<u32, u64>,
}

impl PlayerStats {
    /// Fold one finished session in
    ///
    /// Anything but a win breaks the streak.
    pub fn record(&mut self, summary: &SessionSummary) {
        self.games_played += 1;
        self.total_play_time += summary.play_duration;
        self.hints_used += u64::from(summary.hints_used);

        if summary.outcome == SessionOutcome::Won {
            self.games_won += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
            self.total_attempts += u64::from(summary.attempts_used);
            *self
                .attempts_distribution
                .entry(summary.attempts_used)
                .or_insert(0) += 1;
        } else {
            self.current_streak = 0;
        }
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64 * 100.0
        }
    }

    /// Mean attempts over won games
    #[must_use]
    pub fn average_attempts(&self) -> f64 {
        if self.games_won == 0 {
            0.0
        } else {
            self.total_attempts as f64 / self.games_won as f64
        }
    }

    #[must_use]
    pub fn average_play_time(&self) -> Duration {
        if self.games_played == 0 {
            Duration::ZERO
        } else {
            crate::registry::divide(self.total_play_time, self.games_played)
        }
    }
}

/// Thread-safe in-memory stats store
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    players: DashMap<ParticipantId, PlayerStats>,
}

impl MemoryStatsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of participants with recorded games
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Ordered copy of every participant's stats
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<ParticipantId, PlayerStats> {
        self.players
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Write all stats to `path` as JSON
    ///
    /// # Errors
    /// Returns `StatsError` if serialisation or the write fails.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StatsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, json)?;
        info!(players = self.len(), path = %path.display(), "Saved player stats");
        Ok(())
    }

    /// Load stats previously written by [`save_to`](Self::save_to)
    ///
    /// # Errors
    /// Returns `StatsError` if the file cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let players: BTreeMap<ParticipantId, PlayerStats> = serde_json::from_str(&content)?;
        info!(players = players.len(), path = %path.display(), "Loaded player stats");
        Ok(Self {
            players: players.into_iter().collect(),
        })
    }
}

impl StatsStore for MemoryStatsStore {
    fn record(&self, summary: &SessionSummary) {
        self.players
            .entry(summary.participant.clone())
            .or_default()
            .record(summary);
        debug!(participant = %summary.participant, outcome = ?summary.outcome, "Recorded game");
    }

    fn player(&self, participant: &ParticipantId) -> Option<PlayerStats> {
        self.players.get(participant).map(|stats| stats.clone())
    }
}
