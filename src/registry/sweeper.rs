//! Idle session sweeping

use super::{ParticipantId, SessionRegistry};
use std::time::Duration;
use tracing::{debug, info};

impl SessionRegistry {
    /// End every session older than `threshold`, returning the affected participants
    ///
    /// Age is measured from session creation. Candidates are collected first and
    /// each one is re-checked under its own lock before removal, so a session
    /// that was ended and restarted in between is left alone.
    pub fn sweep_idle(&self, threshold: Duration) -> Vec<ParticipantId> {
        let now = self.now();
        let is_idle = |game: &crate::game::GameState| game.elapsed(now) > threshold;

        let mut swept = Vec::new();
        for participant in self.idle_candidates(is_idle) {
            if let Some((participant, session)) = self.remove_if_idle(&participant, is_idle) {
                let summary = self.retire(participant, session, now);
                debug!(participant = %summary.participant, "Swept idle game");
                swept.push(summary.participant);
            }
        }

        if !swept.is_empty() {
            info!(count = swept.len(), threshold_secs = threshold.as_secs(), "Ended idle games");
        }
        swept
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::{ManualClock, ParticipantId, RegistryConfig, SessionRegistry};
    use crate::wordlists::WordList;
    use std::sync::Arc;
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    fn registry(clock: &Arc<ManualClock>) -> SessionRegistry {
        let words = Arc::new(WordList::new(["kocka", "dlaha", "mamka"], 5).unwrap());
        SessionRegistry::new(words, RegistryConfig::default()).with_clock(clock.clone())
    }

    #[test]
    fn sweeps_only_sessions_older_than_threshold() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(&clock);
        let old_a = ParticipantId::from("old-a");
        let old_b = ParticipantId::from("old-b");
        let young = ParticipantId::from("young");

        registry.start_session(&old_a).unwrap();
        registry.start_session(&old_b).unwrap();
        clock.advance(HOUR);
        registry.start_session(&young).unwrap();
        clock.advance(Duration::from_secs(60));

        let mut swept = registry.sweep_idle(HOUR);
        swept.sort();

        assert_eq!(swept, vec![old_a.clone(), old_b.clone()]);
        assert!(!registry.has_active_session(&old_a));
        assert!(!registry.has_active_session(&old_b));
        assert!(registry.has_active_session(&young));
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn threshold_is_exclusive() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(&clock);
        registry.start_session(&"alice".into()).unwrap();

        clock.advance(HOUR);
        assert!(registry.sweep_idle(HOUR).is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(registry.sweep_idle(HOUR), vec![ParticipantId::from("alice")]);
    }

    #[test]
    fn sweep_on_empty_registry_is_noop() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(&clock);
        assert!(registry.sweep_idle(Duration::ZERO).is_empty());
    }

    #[test]
    fn swept_unfinished_games_count_as_abandoned() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(&clock);
        registry.start_session(&"alice".into()).unwrap();
        clock.advance(2 * HOUR);

        registry.sweep_idle(HOUR);

        let stats = registry.stats();
        assert_eq!(stats.total_started, 1);
        assert_eq!(stats.total_finished, 0);
        assert_eq!(stats.total_play_time, Duration::ZERO);
        assert_eq!(stats.active, 0);
    }

    #[test]
    fn swept_finished_games_keep_their_outcome() {
        let clock = Arc::new(ManualClock::new());
        let words = Arc::new(WordList::new(["kocka"], 5).unwrap());
        let registry =
            SessionRegistry::new(words, RegistryConfig::default()).with_clock(clock.clone());
        let alice = ParticipantId::from("alice");

        registry.start_session(&alice).unwrap();
        registry.submit_guess(&alice, "kocka").unwrap();
        clock.advance(2 * HOUR);

        assert_eq!(registry.sweep_idle(HOUR), vec![alice]);
        let stats = registry.stats();
        assert_eq!(stats.total_won, 1);
        assert_eq!(stats.total_play_time, 2 * HOUR);
    }

    #[test]
    fn sweep_frees_capacity() {
        let clock = Arc::new(ManualClock::new());
        let words = Arc::new(WordList::new(["kocka"], 5).unwrap());
        let config = RegistryConfig {
            max_sessions: 1,
            ..RegistryConfig::default()
        };
        let registry = SessionRegistry::new(words, config).with_clock(clock.clone());

        registry.start_session(&"alice".into()).unwrap();
        assert!(registry.start_session(&"bob".into()).is_err());

        clock.advance(2 * HOUR);
        registry.sweep_idle(HOUR);
        assert!(registry.start_session(&"bob".into()).is_ok());
    }

    #[test]
    fn sweep_races_with_restarts_safely() {
        let clock = Arc::new(ManualClock::new());
        let words = Arc::new(WordList::new(["kocka", "dlaha", "mamka"], 5).unwrap());
        let registry = Arc::new(
            SessionRegistry::new(words, RegistryConfig::default()).with_clock(clock.clone()),
        );
        let participants: Vec<ParticipantId> =
            (0..64).map(|i| ParticipantId::new(format!("p{i}"))).collect();
        for p in &participants {
            registry.start_session(p).unwrap();
        }
        clock.advance(2 * HOUR);

        std::thread::scope(|scope| {
            scope.spawn(|| registry.sweep_idle(HOUR));
            scope.spawn(|| {
                for p in &participants {
                    registry.end_session(p);
                    registry.start_session(p).unwrap();
                }
            });
        });

        // Every participant ends up with exactly one fresh session
        assert_eq!(registry.active_count(), participants.len());
        for p in &participants {
            assert_eq!(registry.session_info(p).unwrap().elapsed, Duration::ZERO);
        }
    }
}
