//! Wordlik - CLI
//!
//! Word-guessing game: play interactively, simulate many concurrent players,
//! or score a single guess.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordlik::{
    commands::{SimulationConfig, run_play, run_simulation, score_pair},
    config::Config,
    output::{print_score_result, print_simulation_result},
    registry::{ParticipantId, SessionRegistry},
    scheduler::{Scheduler, SchedulerConfig, SweepNotifier},
    stats::MemoryStatsStore,
    wordlists::WordList,
};

#[derive(Parser)]
#[command(
    name = "wordlik",
    about = "Word-guessing game with concurrent sessions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Newline-delimited word file (default: embedded list)
    #[arg(short = 'w', long, global = true)]
    word_list: Option<PathBuf>,

    /// Attempts allowed per game
    #[arg(short = 'a', long, global = true)]
    max_attempts: Option<u32>,

    /// Letters per word
    #[arg(short = 'l', long, global = true)]
    word_length: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal (default)
    Play {
        /// Name to play under
        #[arg(short, long, default_value = "player")]
        participant: String,

        /// JSON file to load player statistics from and save them to
        #[arg(short, long)]
        stats_file: Option<PathBuf>,
    },

    /// Run simulated players concurrently against one registry
    Simulate {
        /// Number of simulated players
        #[arg(short = 'n', long, default_value = "100")]
        players: usize,

        /// Games each player plays
        #[arg(short, long, default_value = "1")]
        games: usize,
    },

    /// Show the feedback a guess gets against a target
    Score {
        guess: String,
        target: String,
    },
}

/// Merge the config file with command line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(path) = &cli.word_list {
        config.word_list = Some(path.clone());
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(word_length) = cli.word_length {
        config.word_length = word_length;
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config);

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play {
        participant: "player".to_string(),
        stats_file: None,
    });

    match command {
        Commands::Score { guess, target } => {
            let result = score_pair(&guess, &target)?;
            print_score_result(&result);
            Ok(())
        }
        Commands::Play {
            participant,
            stats_file,
        } => run_play_command(&config, &participant.into(), stats_file.as_deref()),
        Commands::Simulate { players, games } => run_simulate_command(&config, players, games),
    }
}

/// Build the shared registry and start background maintenance
fn start_engine(
    config: &Config,
    on_sweep: Option<SweepNotifier>,
) -> Result<(Arc<SessionRegistry>, Arc<WordList>, Scheduler)> {
    let words = Arc::new(config.load_words().context("Failed to load word list")?);
    info!(words = words.len(), length = words.word_length(), "Word list ready");

    let registry = Arc::new(SessionRegistry::new(words.clone(), config.registry_config()?));
    let scheduler_config = SchedulerConfig {
        on_sweep,
        ..config.scheduler_config()
    };
    let scheduler = Scheduler::start(Arc::clone(&registry), &scheduler_config);
    Ok((registry, words, scheduler))
}

fn stop_engine(registry: &SessionRegistry, scheduler: Scheduler) {
    scheduler.shutdown();
    registry.log_stats();
    registry.clear_all();
}

fn run_play_command(
    config: &Config,
    participant: &ParticipantId,
    stats_file: Option<&Path>,
) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let _guard = runtime.enter();

    let stats = match stats_file {
        Some(path) if path.exists() => MemoryStatsStore::load_from(path)
            .with_context(|| format!("Failed to load stats from {}", path.display()))?,
        _ => MemoryStatsStore::new(),
    };

    let notifier: SweepNotifier = Arc::new(|participant: &ParticipantId| {
        eprintln!("\n⌛ Game of {participant} ended after being idle too long.");
    });
    let (registry, _words, scheduler) = start_engine(config, Some(notifier))?;

    let result = run_play(&registry, &stats, participant);
    stop_engine(&registry, scheduler);

    if let Some(path) = stats_file {
        stats
            .save_to(path)
            .with_context(|| format!("Failed to save stats to {}", path.display()))?;
    }
    result
}

fn run_simulate_command(config: &Config, players: usize, games: usize) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let _guard = runtime.enter();

    let (registry, words, scheduler) = start_engine(config, None)?;
    println!(
        "🎯 Simulating {players} players × {games} games on {} words...",
        words.len()
    );

    let stats = MemoryStatsStore::new();
    let result = run_simulation(
        &registry,
        &words,
        &stats,
        SimulationConfig {
            players,
            games_per_player: games,
            show_progress: true,
        },
    );
    stop_engine(&registry, scheduler);

    print_simulation_result(&result);
    Ok(())
}
