//! Process-wide aggregate counters

use super::{SessionOutcome, SessionSummary};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Increment-only counters shared by every caller of the registry
#[derive(Debug, Default)]
pub(crate) struct AggregateCounters {
    /// Bumped on every reset; sessions started under an older epoch are not folded in
    epoch: AtomicU64,
    started: AtomicU64,
    won: AtomicU64,
    finished: AtomicU64,
    play_time_millis: AtomicU64,
}

impl AggregateCounters {
    /// Count a started session and return the epoch it belongs to
    pub(crate) fn record_start(&self) -> u64 {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        epoch
    }

    /// Fold a retired session in; only finished games of the current epoch contribute
    pub(crate) fn record_end(&self, summary: &SessionSummary, epoch: u64) {
        if summary.outcome == SessionOutcome::Abandoned {
            return;
        }
        if epoch != self.epoch.load(Ordering::SeqCst) {
            return;
        }
        self.play_time_millis
            .fetch_add(summary.play_duration.as_millis() as u64, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
        if summary.outcome == SessionOutcome::Won {
            self.won.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.started.store(0, Ordering::SeqCst);
        self.won.store(0, Ordering::SeqCst);
        self.finished.store(0, Ordering::SeqCst);
        self.play_time_millis.store(0, Ordering::SeqCst);
    }

    /// Read in reverse write order so `won <= finished <= started` holds in the snapshot
    pub(crate) fn snapshot(&self, active: usize) -> RegistryStats {
        let won = self.won.load(Ordering::SeqCst);
        let play_time_millis = self.play_time_millis.load(Ordering::SeqCst);
        let finished = self.finished.load(Ordering::SeqCst);
        let started = self.started.load(Ordering::SeqCst);

        RegistryStats {
            active,
            total_started: started,
            total_won: won,
            total_finished: finished,
            total_play_time: Duration::from_millis(play_time_millis),
        }
    }
}

/// Point-in-time view of the aggregate counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub active: usize,
    pub total_started: u64,
    pub total_won: u64,
    pub total_finished: u64,
    pub total_play_time: Duration,
}

impl RegistryStats {
    /// Won games as a percentage of started games
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_started == 0 {
            0.0
        } else {
            self.total_won as f64 / self.total_started as f64 * 100.0
        }
    }

    /// Mean play time over finished games
    #[must_use]
    pub fn average_game_time(&self) -> Duration {
        if self.total_finished == 0 {
            Duration::ZERO
        } else {
            divide(self.total_play_time, self.total_finished)
        }
    }
}

/// `total / count` without truncating `count` to 32 bits
pub(crate) fn divide(total: Duration, count: u64) -> Duration {
    let nanos = total.as_nanos() / u128::from(count.max(1));
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParticipantId;

    fn summary(outcome: SessionOutcome, secs: u64) -> SessionSummary {
        SessionSummary {
            participant: ParticipantId::from("alice"),
            target: "kocka".to_string(),
            attempts_used: 3,
            max_attempts: 6,
            play_duration: Duration::from_secs(secs),
            outcome,
            hints_used: 0,
        }
    }

    #[test]
    fn abandoned_sessions_only_count_as_started() {
        let counters = AggregateCounters::default();
        let epoch = counters.record_start();
        counters.record_end(&summary(SessionOutcome::Abandoned, 100), epoch);

        let stats = counters.snapshot(0);
        assert_eq!(stats.total_started, 1);
        assert_eq!(stats.total_finished, 0);
        assert_eq!(stats.total_play_time, Duration::ZERO);
    }

    #[test]
    fn finished_sessions_fold_time_and_wins() {
        let counters = AggregateCounters::default();
        let epoch = counters.record_start();
        counters.record_start();
        counters.record_start();
        counters.record_end(&summary(SessionOutcome::Won, 30), epoch);
        counters.record_end(&summary(SessionOutcome::Lost, 90), epoch);

        let stats = counters.snapshot(1);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.total_won, 1);
        assert_eq!(stats.total_finished, 2);
        assert_eq!(stats.total_play_time, Duration::from_secs(120));
        assert_eq!(stats.average_game_time(), Duration::from_secs(60));
        assert!((stats.win_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn reset_zeroes_everything() {
        let counters = AggregateCounters::default();
        let epoch = counters.record_start();
        counters.record_end(&summary(SessionOutcome::Won, 5), epoch);
        counters.reset();

        let stats = counters.snapshot(0);
        assert_eq!(stats.total_started, 0);
        assert_eq!(stats.total_won, 0);
        assert!(stats.win_rate().abs() < f64::EPSILON);
        assert_eq!(stats.average_game_time(), Duration::ZERO);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let counters = AggregateCounters::default();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        let epoch = counters.record_start();
                        counters.record_end(&summary(SessionOutcome::Won, 1), epoch);
                    }
                });
            }
        });
        let stats = counters.snapshot(0);
        assert_eq!(stats.total_started, 8000);
        assert_eq!(stats.total_won, 8000);
        assert_eq!(stats.total_play_time, Duration::from_secs(8000));
    }

    #[test]
    fn sessions_from_before_a_reset_are_not_folded() {
        let counters = AggregateCounters::default();
        let old = counters.record_start();
        counters.reset();
        counters.record_end(&summary(SessionOutcome::Won, 20), old);

        let stats = counters.snapshot(0);
        assert_eq!(stats.total_started, 0);
        assert_eq!(stats.total_won, 0);
        assert_eq!(stats.total_finished, 0);
        assert_eq!(stats.total_play_time, Duration::ZERO);

        let fresh = counters.record_start();
        counters.record_end(&summary(SessionOutcome::Won, 20), fresh);
        let stats = counters.snapshot(0);
        assert_eq!(stats.total_started, 1);
        assert_eq!(stats.total_won, 1);
    }

    #[test]
    fn average_survives_counts_beyond_u32() {
        let stats = RegistryStats {
            active: 0,
            total_started: 1 << 33,
            total_won: 0,
            total_finished: 1 << 33,
            total_play_time: Duration::from_secs(1 << 33),
        };
        assert_eq!(stats.average_game_time(), Duration::from_secs(1));
    }
}
