//! Session registry implementation

use super::counters::AggregateCounters;
use super::{
    Clock, ParticipantId, RegistryError, RegistryStats, SessionInfo, SessionOutcome,
    SessionSummary, SystemClock,
};
use crate::core::Word;
use crate::game::{DEFAULT_MAX_ATTEMPTS, GameState, GuessOutcome};
use crate::wordlists::WordProvider;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Draws from the word provider before accepting a repeated target
pub const WORD_SELECTION_RETRIES: usize = 50;

/// Live sessions allowed at once unless configured otherwise
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Recent targets remembered per participant
pub const DEFAULT_RECENT_WORDS: usize = 100;

/// Tunables for a [`SessionRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub max_attempts: NonZeroU32,
    pub max_sessions: usize,
    pub word_retry_limit: usize,
    pub recent_words_limit: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_sessions: DEFAULT_MAX_SESSIONS,
            word_retry_limit: WORD_SELECTION_RETRIES,
            recent_words_limit: DEFAULT_RECENT_WORDS,
        }
    }
}

#[derive(Debug)]
pub(super) struct Session {
    game: GameState,
    paused: bool,
    hints: u32,
    /// Counter epoch the session was started under
    epoch: u64,
}

/// Concurrent mapping from participant to live game
///
/// Every operation locks only the shard holding the participant's entry, so
/// two operations on the same participant are linearised while different
/// participants rarely contend.
pub struct SessionRegistry {
    sessions: DashMap<ParticipantId, Session>,
    recent_words: DashMap<ParticipantId, VecDeque<String>>,
    word_frequency: DashMap<String, u64>,
    live: AtomicUsize,
    counters: AggregateCounters,
    words: Arc<dyn WordProvider>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("live", &self.live.load(Ordering::SeqCst))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Create a registry drawing words from `words`
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use wordlik::registry::{RegistryConfig, SessionRegistry};
    /// use wordlik::wordlists::WordList;
    ///
    /// let words = Arc::new(WordList::new(["kocka"], 5).unwrap());
    /// let registry = SessionRegistry::new(words, RegistryConfig::default());
    ///
    /// registry.start_session(&"alice".into()).unwrap();
    /// let outcome = registry.submit_guess(&"alice".into(), "kocka").unwrap();
    /// assert!(outcome.is_winning());
    /// ```
    #[must_use]
    pub fn new(words: Arc<dyn WordProvider>, config: RegistryConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            recent_words: DashMap::new(),
            word_frequency: DashMap::new(),
            live: AtomicUsize::new(0),
            counters: AggregateCounters::default(),
            words,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub(super) fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Start a new game for `participant`
    ///
    /// # Errors
    /// - `AlreadyActive` if the participant already has a live game
    /// - `CapacityExceeded` if the live-session ceiling is reached
    /// - `InvalidTarget` if the word provider hands out an unusable word
    #[instrument(level = "debug", skip(self, participant), fields(participant = %participant))]
    pub fn start_session(&self, participant: &ParticipantId) -> Result<SessionInfo, RegistryError> {
        let Entry::Vacant(slot) = self.sessions.entry(participant.clone()) else {
            debug!("Participant already has an active game");
            return Err(RegistryError::AlreadyActive(participant.clone()));
        };

        self.reserve_slot()?;

        let target = match self.select_target(participant) {
            Ok(target) => target,
            Err(e) => {
                self.live.fetch_sub(1, Ordering::SeqCst);
                return Err(e);
            }
        };

        let now = self.clock.now();
        let game = GameState::with_max_attempts(target.clone(), self.config.max_attempts, now);
        let session = Session {
            game,
            paused: false,
            hints: 0,
            epoch: self.counters.record_start(),
        };
        let info = describe(participant, &session, now);
        slot.insert(session);

        self.remember_word(participant, target.text());
        *self
            .word_frequency
            .entry(target.text().to_string())
            .or_insert(0) += 1;

        info!(word_length = target.len(), "Game started");
        debug!(target = %target, "Target selected");
        Ok(info)
    }

    /// End `participant`'s game, if any
    ///
    /// Idempotent: ending an absent session returns `None`. A game that reached
    /// a terminal state is folded into the win counter and play time.
    #[instrument(level = "debug", skip(self, participant), fields(participant = %participant))]
    pub fn end_session(&self, participant: &ParticipantId) -> Option<SessionSummary> {
        let (participant, session) = self.sessions.remove(participant)?;
        Some(self.retire(participant, session, self.clock.now()))
    }

    /// Submit a guess to `participant`'s game
    ///
    /// # Errors
    /// - `NoActiveSession` if the participant has no live game
    /// - `SessionPaused` if the game is paused
    /// - `Guess` for any rejection by the game itself
    #[instrument(level = "debug", skip(self, participant), fields(participant = %participant))]
    pub fn submit_guess(
        &self,
        participant: &ParticipantId,
        word: &str,
    ) -> Result<GuessOutcome, RegistryError> {
        let mut session = self
            .sessions
            .get_mut(participant)
            .ok_or_else(|| RegistryError::NoActiveSession(participant.clone()))?;

        if session.paused {
            return Err(RegistryError::SessionPaused(participant.clone()));
        }

        let outcome = session.game.submit_guess(word, self.words.as_ref())?;
        debug!(
            attempt = outcome.attempt_number,
            status = ?outcome.status,
            "Guess accepted"
        );
        Ok(outcome)
    }

    /// Reveal the first letter of `participant`'s target
    ///
    /// Each call is counted and reported as `hints_used` when the session ends.
    ///
    /// # Errors
    /// `NoActiveSession` if the participant has no live game.
    #[instrument(level = "debug", skip(self, participant), fields(participant = %participant))]
    pub fn hint(&self, participant: &ParticipantId) -> Result<char, RegistryError> {
        let mut session = self
            .sessions
            .get_mut(participant)
            .ok_or_else(|| RegistryError::NoActiveSession(participant.clone()))?;

        // Targets are validated non-empty
        let first = session.game.secret_target().chars().next().unwrap_or_default();
        session.hints += 1;
        debug!(hints = session.hints, "Hint given");
        Ok(first)
    }

    #[must_use]
    pub fn has_active_session(&self, participant: &ParticipantId) -> bool {
        self.sessions.contains_key(participant)
    }

    /// Snapshot of `participant`'s game state
    #[must_use]
    pub fn session(&self, participant: &ParticipantId) -> Option<GameState> {
        self.with_session(participant, GameState::clone)
    }

    /// Run `f` against `participant`'s game while holding its lock
    ///
    /// # Deadlocks
    /// `f` must not call back into the registry; the shard lock is held.
    pub(crate) fn with_session<R>(
        &self,
        participant: &ParticipantId,
        f: impl FnOnce(&GameState) -> R,
    ) -> Option<R> {
        self.sessions.get(participant).map(|session| f(&session.game))
    }

    /// Read-only summary of `participant`'s game
    #[must_use]
    pub fn session_info(&self, participant: &ParticipantId) -> Option<SessionInfo> {
        let now = self.clock.now();
        self.sessions
            .get(participant)
            .map(|session| describe(participant, &session, now))
    }

    /// Pause `participant`'s game; guesses are refused until resumed
    ///
    /// # Errors
    /// Returns `NoActiveSession` if the participant has no live game.
    pub fn pause_session(&self, participant: &ParticipantId) -> Result<(), RegistryError> {
        self.set_paused(participant, true)
    }

    /// Resume a paused game
    ///
    /// # Errors
    /// Returns `NoActiveSession` if the participant has no live game.
    pub fn resume_session(&self, participant: &ParticipantId) -> Result<(), RegistryError> {
        self.set_paused(participant, false)
    }

    #[must_use]
    pub fn is_paused(&self, participant: &ParticipantId) -> bool {
        self.sessions
            .get(participant)
            .is_some_and(|session| session.paused)
    }

    fn set_paused(&self, participant: &ParticipantId, paused: bool) -> Result<(), RegistryError> {
        let mut session = self
            .sessions
            .get_mut(participant)
            .ok_or_else(|| RegistryError::NoActiveSession(participant.clone()))?;
        session.paused = paused;
        debug!(participant = %participant, paused, "Pause state changed");
        Ok(())
    }

    /// Number of live sessions
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn active_participants(&self) -> Vec<ParticipantId> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Live sessions still accepting guesses
    #[must_use]
    pub fn count_in_progress(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| !entry.game.is_finished())
            .count()
    }

    /// Live sessions that reached a terminal state but were not ended yet
    #[must_use]
    pub fn count_finished(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.game.is_finished())
            .count()
    }

    /// Recent targets played by `participant`, oldest first
    #[must_use]
    pub fn participant_history(&self, participant: &ParticipantId) -> Vec<String> {
        self.recent_words
            .get(participant)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Target words ranked by how often they were dealt
    #[must_use]
    pub fn most_played_words(&self, limit: usize) -> Vec<(String, u64)> {
        let mut words: Vec<(String, u64)> = self
            .word_frequency
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(limit);
        words
    }

    /// Aggregate counters
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.counters.snapshot(self.active_count())
    }

    /// Administrative reset of counters and word frequency
    pub fn reset_stats(&self) {
        self.counters.reset();
        self.word_frequency.clear();
        info!("Global statistics reset");
    }

    /// Stats-logging hook for the scheduler
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            active = stats.active,
            started = stats.total_started,
            won = stats.total_won,
            win_rate = format_args!("{:.2}%", stats.win_rate()),
            average_game_secs = stats.average_game_time().as_secs(),
            "Session statistics"
        );
    }

    /// Drop every live session without folding outcomes; returns how many were dropped
    pub fn clear_all(&self) -> usize {
        let cleared = self
            .active_participants()
            .iter()
            .filter(|participant| self.remove_session(participant).is_some())
            .count();
        info!(cleared, "Cleared all games");
        cleared
    }

    fn remove_session(&self, participant: &ParticipantId) -> Option<(ParticipantId, Session)> {
        let removed = self.sessions.remove(participant);
        if removed.is_some() {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
        removed
    }

    /// Release a removed session's slot and fold it into the counters
    pub(super) fn retire(
        &self,
        participant: ParticipantId,
        session: Session,
        now: Instant,
    ) -> SessionSummary {
        self.live.fetch_sub(1, Ordering::SeqCst);

        let Session { game, hints, epoch, .. } = session;
        let summary = SessionSummary {
            target: game.secret_target().to_string(),
            attempts_used: game.attempts_used(),
            max_attempts: game.max_attempts(),
            play_duration: game.elapsed(now),
            outcome: SessionOutcome::from(game.status()),
            hints_used: hints,
            participant,
        };
        self.counters.record_end(&summary, epoch);

        info!(
            participant = %summary.participant,
            attempts = summary.attempts_used,
            outcome = ?summary.outcome,
            "Game ended"
        );
        summary
    }

    pub(super) fn remove_if_idle(
        &self,
        participant: &ParticipantId,
        is_idle: impl FnOnce(&GameState) -> bool,
    ) -> Option<(ParticipantId, Session)> {
        self.sessions
            .remove_if(participant, |_, session| is_idle(&session.game))
    }

    pub(super) fn idle_candidates(
        &self,
        is_idle: impl Fn(&GameState) -> bool,
    ) -> Vec<ParticipantId> {
        self.sessions
            .iter()
            .filter(|entry| is_idle(&entry.game))
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn reserve_slot(&self) -> Result<(), RegistryError> {
        let limit = self.config.max_sessions;
        self.live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                (live < limit).then_some(live + 1)
            })
            .map(|_| ())
            .map_err(|_| {
                warn!(limit, "Session capacity reached");
                RegistryError::CapacityExceeded { limit }
            })
    }

    /// Pick a target not among the participant's recent words
    ///
    /// Draws at most `word_retry_limit` times, then takes one unconditional draw.
    fn select_target(&self, participant: &ParticipantId) -> Result<Word, RegistryError> {
        let recent = self.recent_words.get(participant);
        let is_recent = |word: &str| {
            recent
                .as_ref()
                .is_some_and(|history| history.iter().any(|w| w == word))
        };

        let fresh = (0..self.config.word_retry_limit)
            .map(|_| self.words.random_word())
            .find(|candidate| !is_recent(candidate.as_str()));
        drop(recent);

        let candidate = fresh.unwrap_or_else(|| {
            debug!(
                retries = self.config.word_retry_limit,
                "No unplayed word found, accepting a repeat"
            );
            self.words.random_word()
        });

        Word::new(&candidate).map_err(|source| RegistryError::InvalidTarget {
            word: candidate,
            source,
        })
    }

    fn remember_word(&self, participant: &ParticipantId, word: &str) {
        let mut history = self.recent_words.entry(participant.clone()).or_default();
        history.push_back(word.to_string());
        while history.len() > self.config.recent_words_limit {
            history.pop_front();
        }
    }
}

fn describe(participant: &ParticipantId, session: &Session, now: Instant) -> SessionInfo {
    let game = &session.game;
    SessionInfo {
        participant: participant.clone(),
        status: game.status(),
        paused: session.paused,
        word_length: game.word_length(),
        attempts_used: game.attempts_used(),
        attempts_remaining: game.attempts_remaining(),
        max_attempts: game.max_attempts(),
        guesses: game.guesses(),
        elapsed: game.elapsed(now),
        target: game.target_word().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameStatus, GuessError};
    use crate::registry::ManualClock;
    use crate::wordlists::WordList;
    use std::sync::Mutex;
    use std::time::Duration;

    const WORDS: [&str; 10] = [
        "kocka", "dlaha", "mamka", "crane", "slate", "robot", "floor", "hello", "speed", "erase",
    ];

    /// Hands out words from a fixed script, repeating the last one
    struct ScriptedWords {
        valid: WordList,
        script: Mutex<VecDeque<&'static str>>,
        last: Mutex<&'static str>,
        draws: AtomicUsize,
    }

    impl ScriptedWords {
        fn new(script: &[&'static str]) -> Self {
            Self {
                valid: WordList::new(WORDS, 5).unwrap(),
                script: Mutex::new(script.iter().copied().collect()),
                last: Mutex::new(script[0]),
                draws: AtomicUsize::new(0),
            }
        }
    }

    impl WordProvider for ScriptedWords {
        fn is_valid(&self, word: &str) -> bool {
            self.valid.is_valid(word)
        }

        fn random_word(&self) -> String {
            self.draws.fetch_add(1, Ordering::SeqCst);
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.script.lock().unwrap().pop_front() {
                *last = next;
            }
            (*last).to_string()
        }
    }

    fn registry_with(words: Arc<dyn WordProvider>, config: RegistryConfig) -> SessionRegistry {
        SessionRegistry::new(words, config)
    }

    fn registry() -> SessionRegistry {
        registry_with(Arc::new(ScriptedWords::new(&["kocka"])), RegistryConfig::default())
    }

    fn id(name: &str) -> ParticipantId {
        ParticipantId::from(name)
    }

    #[test]
    fn start_creates_session() {
        let registry = registry();
        let info = registry.start_session(&id("alice")).unwrap();

        assert_eq!(info.status, GameStatus::InProgress);
        assert_eq!(info.attempts_used, 0);
        assert_eq!(info.attempts_remaining, 6);
        assert_eq!(info.word_length, 5);
        assert_eq!(info.target, None);
        assert!(registry.has_active_session(&id("alice")));
        assert!(!registry.has_active_session(&id("bob")));
        assert_eq!(registry.stats().total_started, 1);
    }

    #[test]
    fn second_start_is_already_active() {
        let registry = registry();
        registry.start_session(&id("alice")).unwrap();
        registry.submit_guess(&id("alice"), "crane").unwrap();

        assert_eq!(
            registry.start_session(&id("alice")),
            Err(RegistryError::AlreadyActive(id("alice")))
        );
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.stats().total_started, 1);
        // Existing game untouched
        assert_eq!(registry.session(&id("alice")).unwrap().attempts_used(), 1);
    }

    #[test]
    fn capacity_is_enforced() {
        let config = RegistryConfig {
            max_sessions: 2,
            ..RegistryConfig::default()
        };
        let registry = registry_with(Arc::new(ScriptedWords::new(&["kocka"])), config);

        registry.start_session(&id("a")).unwrap();
        registry.start_session(&id("b")).unwrap();
        assert_eq!(
            registry.start_session(&id("c")),
            Err(RegistryError::CapacityExceeded { limit: 2 })
        );
        assert!(!registry.has_active_session(&id("c")));
        assert_eq!(registry.stats().total_started, 2);

        registry.end_session(&id("a"));
        assert!(registry.start_session(&id("c")).is_ok());
    }

    #[test]
    fn end_is_idempotent() {
        let registry = registry();
        registry.start_session(&id("alice")).unwrap();

        let summary = registry.end_session(&id("alice")).unwrap();
        assert_eq!(summary.outcome, SessionOutcome::Abandoned);
        assert_eq!(summary.target, "kocka");
        assert_eq!(registry.end_session(&id("alice")), None);
        assert_eq!(registry.end_session(&id("nobody")), None);
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn ending_won_game_folds_counters() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry().with_clock(clock.clone());
        let alice = id("alice");

        registry.start_session(&alice).unwrap();
        registry.submit_guess(&alice, "crane").unwrap();
        clock.advance(Duration::from_secs(42));
        let outcome = registry.submit_guess(&alice, "kocka").unwrap();
        assert!(outcome.is_winning());

        let summary = registry.end_session(&alice).unwrap();
        assert_eq!(summary.outcome, SessionOutcome::Won);
        assert_eq!(summary.winning_attempts(), Some(2));
        assert_eq!(summary.play_duration, Duration::from_secs(42));

        let stats = registry.stats();
        assert_eq!(stats.total_won, 1);
        assert_eq!(stats.total_finished, 1);
        assert_eq!(stats.total_play_time, Duration::from_secs(42));
        assert!((stats.win_rate() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ending_lost_game_is_not_a_win() {
        let config = RegistryConfig {
            max_attempts: NonZeroU32::new(2).unwrap(),
            ..RegistryConfig::default()
        };
        let registry = registry_with(Arc::new(ScriptedWords::new(&["kocka"])), config);
        let alice = id("alice");

        registry.start_session(&alice).unwrap();
        registry.submit_guess(&alice, "crane").unwrap();
        let last = registry.submit_guess(&alice, "slate").unwrap();
        assert_eq!(last.status, GameStatus::Lost);
        assert_eq!(last.target.as_deref(), Some("kocka"));

        let summary = registry.end_session(&alice).unwrap();
        assert_eq!(summary.outcome, SessionOutcome::Lost);
        assert_eq!(summary.winning_attempts(), None);
        assert_eq!(registry.stats().total_won, 0);
        assert_eq!(registry.stats().total_finished, 1);
    }

    #[test]
    fn reset_mid_game_excludes_that_game_from_totals() {
        let registry = registry();
        let alice = id("alice");

        registry.start_session(&alice).unwrap();
        registry.reset_stats();
        assert!(registry.submit_guess(&alice, "kocka").unwrap().is_winning());
        let summary = registry.end_session(&alice).unwrap();
        assert_eq!(summary.outcome, SessionOutcome::Won);

        let stats = registry.stats();
        assert_eq!(stats.total_started, 0);
        assert_eq!(stats.total_won, 0);
        assert_eq!(stats.total_finished, 0);
        assert!(stats.win_rate().abs() < f64::EPSILON);

        registry.start_session(&alice).unwrap();
        registry.submit_guess(&alice, "kocka").unwrap();
        registry.end_session(&alice);
        let stats = registry.stats();
        assert_eq!(stats.total_started, 1);
        assert_eq!(stats.total_won, 1);
    }

    #[test]
    fn hint_reveals_first_letter_and_is_counted() {
        let registry = registry();
        let alice = id("alice");

        assert_eq!(
            registry.hint(&alice),
            Err(RegistryError::NoActiveSession(alice.clone()))
        );

        registry.start_session(&alice).unwrap();
        assert_eq!(registry.hint(&alice), Ok('k'));
        assert_eq!(registry.hint(&alice), Ok('k'));
        assert_eq!(registry.session(&alice).unwrap().attempts_used(), 0);

        let summary = registry.end_session(&alice).unwrap();
        assert_eq!(summary.hints_used, 2);

        registry.start_session(&alice).unwrap();
        assert_eq!(registry.end_session(&alice).unwrap().hints_used, 0);
    }

    #[test]
    fn guess_without_session_is_rejected() {
        let registry = registry();
        assert_eq!(
            registry.submit_guess(&id("ghost"), "kocka"),
            Err(RegistryError::NoActiveSession(id("ghost")))
        );
    }

    #[test]
    fn guess_errors_pass_through() {
        let registry = registry();
        registry.start_session(&id("alice")).unwrap();
        assert_eq!(
            registry.submit_guess(&id("alice"), "zzzzz"),
            Err(RegistryError::Guess(GuessError::InvalidWord("zzzzz".into())))
        );
        registry.submit_guess(&id("alice"), "kocka").unwrap();
        assert_eq!(
            registry.submit_guess(&id("alice"), "crane"),
            Err(RegistryError::Guess(GuessError::AlreadyFinished))
        );
    }

    #[test]
    fn paused_session_refuses_guesses() {
        let registry = registry();
        let alice = id("alice");
        registry.start_session(&alice).unwrap();

        registry.pause_session(&alice).unwrap();
        assert!(registry.is_paused(&alice));
        assert_eq!(
            registry.submit_guess(&alice, "crane"),
            Err(RegistryError::SessionPaused(alice.clone()))
        );
        assert_eq!(registry.session(&alice).unwrap().attempts_used(), 0);

        registry.resume_session(&alice).unwrap();
        assert!(!registry.is_paused(&alice));
        assert!(registry.submit_guess(&alice, "crane").is_ok());
    }

    #[test]
    fn pausing_absent_session_fails() {
        let registry = registry();
        assert_eq!(
            registry.pause_session(&id("ghost")),
            Err(RegistryError::NoActiveSession(id("ghost")))
        );
        assert!(!registry.is_paused(&id("ghost")));
    }

    #[test]
    fn pause_state_dies_with_session() {
        let registry = registry();
        let alice = id("alice");
        registry.start_session(&alice).unwrap();
        registry.pause_session(&alice).unwrap();
        registry.end_session(&alice);
        registry.start_session(&alice).unwrap();
        assert!(!registry.is_paused(&alice));
    }

    #[test]
    fn selection_skips_recent_words() {
        let words = Arc::new(ScriptedWords::new(&["kocka", "kocka", "kocka", "dlaha"]));
        let registry = registry_with(words.clone(), RegistryConfig::default());
        let alice = id("alice");

        registry.start_session(&alice).unwrap();
        registry.end_session(&alice);
        registry.start_session(&alice).unwrap();
        registry.submit_guess(&alice, "dlaha").unwrap();

        assert_eq!(registry.participant_history(&alice), vec!["kocka", "dlaha"]);
        assert_eq!(words.draws.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn selection_falls_back_after_retry_limit() {
        let words = Arc::new(ScriptedWords::new(&["kocka"]));
        let registry = registry_with(words.clone(), RegistryConfig::default());
        let alice = id("alice");

        registry.start_session(&alice).unwrap();
        registry.end_session(&alice);
        registry.start_session(&alice).unwrap();

        assert_eq!(registry.participant_history(&alice), vec!["kocka", "kocka"]);
        assert_eq!(words.draws.load(Ordering::SeqCst), 1 + WORD_SELECTION_RETRIES);
    }

    #[test]
    fn recent_history_is_per_participant() {
        let words = Arc::new(ScriptedWords::new(&["kocka"]));
        let registry = registry_with(words.clone(), RegistryConfig::default());

        registry.start_session(&id("alice")).unwrap();
        registry.start_session(&id("bob")).unwrap();

        // Bob's first draw is accepted even though Alice has the same word
        assert_eq!(words.draws.load(Ordering::SeqCst), 2);
        assert!(registry.participant_history(&id("carol")).is_empty());
    }

    #[test]
    fn recent_history_is_bounded() {
        let config = RegistryConfig {
            recent_words_limit: 2,
            word_retry_limit: 1,
            ..RegistryConfig::default()
        };
        let words = Arc::new(ScriptedWords::new(&["kocka", "dlaha", "mamka"]));
        let registry = registry_with(words, config);
        let alice = id("alice");

        for _ in 0..3 {
            registry.start_session(&alice).unwrap();
            registry.end_session(&alice);
        }
        assert_eq!(registry.participant_history(&alice), vec!["dlaha", "mamka"]);
    }

    #[test]
    fn invalid_target_releases_reservation() {
        let config = RegistryConfig {
            max_sessions: 1,
            ..RegistryConfig::default()
        };
        let words = Arc::new(ScriptedWords::new(&["k0cka", "kocka"]));
        let registry = registry_with(words, config);

        assert!(matches!(
            registry.start_session(&id("alice")),
            Err(RegistryError::InvalidTarget { .. })
        ));
        assert!(!registry.has_active_session(&id("alice")));
        assert!(registry.start_session(&id("alice")).is_ok());
    }

    #[test]
    fn session_info_reports_progress() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry().with_clock(clock.clone());
        let alice = id("alice");
        registry.start_session(&alice).unwrap();
        registry.submit_guess(&alice, "crane").unwrap();
        registry.submit_guess(&alice, "slate").unwrap();
        clock.advance(Duration::from_secs(5));

        let info = registry.session_info(&alice).unwrap();
        assert_eq!(info.attempts_used, 2);
        assert_eq!(info.attempts_remaining, 4);
        assert_eq!(info.guesses, vec!["crane", "slate"]);
        assert_eq!(info.elapsed, Duration::from_secs(5));
        assert!(!info.is_finished());
        assert_eq!(registry.session_info(&id("bob")), None);
    }

    #[test]
    fn counts_split_by_status() {
        let registry = registry();
        registry.start_session(&id("a")).unwrap();
        registry.start_session(&id("b")).unwrap();
        registry.submit_guess(&id("b"), "kocka").unwrap();

        assert_eq!(registry.count_in_progress(), 1);
        assert_eq!(registry.count_finished(), 1);
        let mut active = registry.active_participants();
        active.sort();
        assert_eq!(active, vec![id("a"), id("b")]);
    }

    #[test]
    fn word_frequency_and_reset() {
        let words = Arc::new(ScriptedWords::new(&["kocka", "dlaha", "kocka"]));
        let registry = registry_with(words, RegistryConfig::default());
        registry.start_session(&id("a")).unwrap();
        registry.start_session(&id("b")).unwrap();
        registry.start_session(&id("c")).unwrap();

        assert_eq!(
            registry.most_played_words(5),
            vec![("kocka".to_string(), 2), ("dlaha".to_string(), 1)]
        );
        assert_eq!(registry.most_played_words(1).len(), 1);

        registry.reset_stats();
        assert!(registry.most_played_words(5).is_empty());
        assert_eq!(registry.stats().total_started, 0);
        assert_eq!(registry.stats().active, 3);
    }

    #[test]
    fn clear_all_drops_sessions_and_frees_capacity() {
        let config = RegistryConfig {
            max_sessions: 2,
            ..RegistryConfig::default()
        };
        let registry = registry_with(Arc::new(ScriptedWords::new(&["kocka"])), config);
        registry.start_session(&id("a")).unwrap();
        registry.start_session(&id("b")).unwrap();

        assert_eq!(registry.clear_all(), 2);
        assert_eq!(registry.active_count(), 0);
        assert!(registry.start_session(&id("c")).is_ok());
        assert!(registry.start_session(&id("d")).is_ok());
    }

    #[test]
    fn concurrent_guesses_on_one_session_are_linearised() {
        let registry = registry_with(
            Arc::new(ScriptedWords::new(&["kocka"])),
            RegistryConfig::default(),
        );
        let alice = id("alice");
        registry.start_session(&alice).unwrap();

        let misses = ["dlaha", "mamka", "crane", "slate", "robot", "floor", "hello", "speed"];
        let accepted = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for word in misses {
                let registry = &registry;
                let alice = &alice;
                let accepted = &accepted;
                scope.spawn(move || {
                    if registry.submit_guess(alice, word).is_ok() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        let game = registry.session(&alice).unwrap();
        assert_eq!(accepted.load(Ordering::SeqCst), 6);
        assert_eq!(game.attempts_used(), 6);
        assert_eq!(game.history().len(), 6);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn concurrent_starts_for_one_participant_create_one_session() {
        let registry = registry();
        let alice = id("alice");
        let created = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    if registry.start_session(&alice).is_ok() {
                        created.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.stats().total_started, 1);
    }

    #[test]
    fn concurrent_starts_never_exceed_capacity() {
        use rayon::prelude::*;

        let config = RegistryConfig {
            max_sessions: 10,
            ..RegistryConfig::default()
        };
        let registry = registry_with(Arc::new(WordList::new(WORDS, 5).unwrap()), config);

        let created = (0..64)
            .into_par_iter()
            .filter(|i| registry.start_session(&ParticipantId::new(format!("p{i}"))).is_ok())
            .count();

        assert_eq!(created, 10);
        assert_eq!(registry.active_count(), 10);
    }
}
