//! Interactive terminal game
//!
//! One participant plays against the shared registry. Between guesses the
//! player may type a command instead of a word:
//! `quit`, `new`, `pause`, `resume`, `stats`, `hint`.

use crate::game::GuessOutcome;
use crate::output::display;
use crate::registry::{ParticipantId, RegistryError, SessionRegistry};
use crate::stats::StatsStore;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

enum Command<'a> {
    Quit,
    New,
    Pause,
    Resume,
    Stats,
    Hint,
    Guess(&'a str),
}

impl<'a> Command<'a> {
    fn parse(input: &'a str) -> Self {
        match input.to_lowercase().as_str() {
            "quit" | "q" | "exit" => Self::Quit,
            "new" | "n" => Self::New,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "stats" => Self::Stats,
            "hint" | "h" => Self::Hint,
            _ => Self::Guess(input),
        }
    }
}

/// Run the interactive game on stdin/stdout
///
/// # Errors
/// Returns an error on terminal I/O failure or when no game can be started.
pub fn run_play(
    registry: &SessionRegistry,
    stats: &dyn StatsStore,
    participant: &ParticipantId,
) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play_session(registry, stats, participant, &mut stdin.lock(), &mut stdout.lock())
}

/// Game loop over arbitrary input and output streams
///
/// End of input behaves like `quit`.
///
/// # Errors
/// Returns an error on I/O failure or when no game can be started.
pub fn play_session<R: BufRead, W: Write>(
    registry: &SessionRegistry,
    stats: &dyn StatsStore,
    participant: &ParticipantId,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    display::write_banner(out, registry.config().max_attempts.get())?;
    start_game(registry, participant, out)?;

    loop {
        let Some(line) = get_user_input(input, out, "Guess")? else {
            finish_game(registry, stats, participant, out)?;
            return Ok(());
        };
        if line.is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Command::Quit => {
                finish_game(registry, stats, participant, out)?;
                writeln!(out, "\n👋 Thanks for playing!\n")?;
                return Ok(());
            }
            Command::New => {
                finish_game(registry, stats, participant, out)?;
                start_game(registry, participant, out)?;
            }
            Command::Pause => match registry.pause_session(participant) {
                Ok(()) => writeln!(out, "⏸  Game paused. Type 'resume' to continue.")?,
                Err(e) => writeln!(out, "❌ {e}")?,
            },
            Command::Resume => match registry.resume_session(participant) {
                Ok(()) => writeln!(out, "▶  Game resumed.")?,
                Err(e) => writeln!(out, "❌ {e}")?,
            },
            Command::Stats => {
                display::write_player_stats(out, participant, stats.player(participant).as_ref())?;
                display::write_registry_stats(out, &registry.stats())?;
            }
            Command::Hint => match registry.hint(participant) {
                Ok(letter) => writeln!(
                    out,
                    "💡 The word starts with '{}'.",
                    letter.to_uppercase()
                )?,
                Err(e) => writeln!(out, "❌ {e}")?,
            },
            Command::Guess(word) => match registry.submit_guess(participant, word) {
                Ok(outcome) => {
                    show_outcome(registry, participant, &outcome, out)?;
                    if outcome.is_game_ending() {
                        finish_game(registry, stats, participant, out)?;
                        match get_user_input(input, out, "Play again? (yes/no)")?.as_deref() {
                            Some("yes" | "y") => start_game(registry, participant, out)?,
                            _ => {
                                writeln!(out, "\n👋 Thanks for playing!\n")?;
                                return Ok(());
                            }
                        }
                    }
                }
                Err(RegistryError::NoActiveSession(_)) => {
                    writeln!(out, "⌛ Your game timed out. Starting a new one.")?;
                    start_game(registry, participant, out)?;
                }
                Err(e) => writeln!(out, "❌ {e}")?,
            },
        }
    }
}

fn start_game<W: Write>(
    registry: &SessionRegistry,
    participant: &ParticipantId,
    out: &mut W,
) -> Result<()> {
    let info = registry
        .start_session(participant)
        .with_context(|| format!("Could not start a game for {participant}"))?;
    debug!(participant = %participant, "Interactive game started");
    writeln!(
        out,
        "\n🔄 New game! Guess the {}-letter word in {} attempts.\n",
        info.word_length, info.max_attempts
    )?;
    Ok(())
}

/// End the current game, if any, and hand its summary to the stats store
fn finish_game<W: Write>(
    registry: &SessionRegistry,
    stats: &dyn StatsStore,
    participant: &ParticipantId,
    out: &mut W,
) -> Result<()> {
    if let Some(summary) = registry.end_session(participant) {
        stats.record(&summary);
        display::write_summary(out, &summary)?;
    }
    Ok(())
}

fn show_outcome<W: Write>(
    registry: &SessionRegistry,
    participant: &ParticipantId,
    outcome: &GuessOutcome,
    out: &mut W,
) -> Result<()> {
    display::write_guess_row(out, outcome)?;
    if !outcome.is_game_ending() {
        if let Some(knowledge) =
            registry.with_session(participant, |game| game.letter_knowledge().clone())
        {
            display::write_keyboard(out, &knowledge)?;
        }
    }
    Ok(())
}

/// Prompt and read one trimmed line; `None` at end of input
fn get_user_input<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{prompt}: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
