//! Concurrent simulated play
//!
//! Many simulated participants play against one shared registry at once.
//! Each one guesses a random word still consistent with the feedback it has
//! seen, so games usually end well within the attempt limit.

use crate::core::Word;
use crate::registry::{ParticipantId, RegistryError, RegistryStats, SessionRegistry};
use crate::stats::{MemoryStatsStore, StatsStore};
use crate::wordlists::WordList;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::IndexedRandom;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub players: usize,
    pub games_per_player: usize,
    pub show_progress: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: 100,
            games_per_player: 1,
            show_progress: true,
        }
    }
}

/// Statistics from a simulation run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub players: usize,
    pub games_played: u64,
    pub won: u64,
    pub lost: u64,
    /// Starts refused by the registry (capacity) plus games cut short
    pub rejected: u64,
    /// Won games keyed by attempts needed
    pub distribution: BTreeMap<u32, u64>,
    pub average_attempts: f64,
    pub duration: Duration,
    pub registry: RegistryStats,
    /// Most frequently dealt targets
    pub top_words: Vec<(String, u64)>,
}

enum GameEnd {
    Won(u32),
    Lost,
    Interrupted,
}

/// Run `config.players` participants concurrently against `registry`
///
/// Every finished game is recorded in `stats`.
pub fn run_simulation(
    registry: &SessionRegistry,
    words: &WordList,
    stats: &MemoryStatsStore,
    config: SimulationConfig,
) -> SimulationResult {
    let total_games = (config.players * config.games_per_player) as u64;
    let pb = if config.show_progress {
        let pb = ProgressBar::new(total_games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let vocabulary: Vec<Word> = words
        .words()
        .iter()
        .filter_map(|w| Word::new(w).ok())
        .collect();
    let won = AtomicU64::new(0);
    let lost = AtomicU64::new(0);
    let rejected = AtomicU64::new(0);
    let distribution = Mutex::new(BTreeMap::new());
    let start = Instant::now();

    (0..config.players).into_par_iter().for_each(|i| {
        let participant = ParticipantId::new(format!("sim-{i:04}"));
        for _ in 0..config.games_per_player {
            match play_one(registry, stats, &participant, &vocabulary) {
                Ok(GameEnd::Won(attempts)) => {
                    won.fetch_add(1, Ordering::Relaxed);
                    if let Ok(mut dist) = distribution.lock() {
                        *dist.entry(attempts).or_insert(0) += 1;
                    }
                }
                Ok(GameEnd::Lost) => {
                    lost.fetch_add(1, Ordering::Relaxed);
                }
                Ok(GameEnd::Interrupted) | Err(_) => {
                    rejected.fetch_add(1, Ordering::Relaxed);
                }
            }
            pb.inc(1);
        }
        pb.set_message(format!("won {}", won.load(Ordering::Relaxed)));
    });

    pb.finish_with_message("Complete!");

    let distribution = distribution.into_inner().unwrap_or_default();
    let won = won.into_inner();
    let total_attempts: u64 = distribution
        .iter()
        .map(|(&attempts, &count)| u64::from(attempts) * count)
        .sum();

    SimulationResult {
        players: config.players,
        games_played: total_games,
        won,
        lost: lost.into_inner(),
        rejected: rejected.into_inner(),
        average_attempts: if won == 0 {
            0.0
        } else {
            total_attempts as f64 / won as f64
        },
        distribution,
        duration: start.elapsed(),
        registry: registry.stats(),
        top_words: registry.most_played_words(5),
    }
}

/// Play a single game from start to teardown
fn play_one(
    registry: &SessionRegistry,
    stats: &MemoryStatsStore,
    participant: &ParticipantId,
    vocabulary: &[Word],
) -> Result<GameEnd, RegistryError> {
    registry.start_session(participant).inspect_err(|e| {
        debug!(participant = %participant, error = %e, "Simulated start refused");
    })?;

    let mut candidates: Vec<&Word> = vocabulary.iter().collect();
    let mut rng = rand::rng();

    let end = loop {
        let Some(&guess) = candidates.choose(&mut rng) else {
            warn!(participant = %participant, "Simulated player ran out of candidates");
            break GameEnd::Interrupted;
        };

        let outcome = match registry.submit_guess(participant, guess.text()) {
            Ok(outcome) => outcome,
            // Swept by the scheduler mid-game
            Err(RegistryError::NoActiveSession(_)) => return Ok(GameEnd::Interrupted),
            Err(e) => {
                warn!(participant = %participant, error = %e, "Simulated guess rejected");
                break GameEnd::Interrupted;
            }
        };

        if outcome.is_winning() {
            break GameEnd::Won(outcome.attempt_number);
        }
        if outcome.is_game_ending() {
            break GameEnd::Lost;
        }
        candidates.retain(|candidate| outcome.feedback.is_consistent(guess, candidate));
    };

    if let Some(summary) = registry.end_session(participant) {
        stats.record(&summary);
    }
    Ok(end)
}
