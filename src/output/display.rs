//! Display functions for game and command results

use super::formatters::{colored_row, create_progress_bar, format_duration, keyboard};
use crate::commands::{ScoreResult, SimulationResult};
use crate::core::Mark;
use crate::game::GuessOutcome;
use crate::registry::{ParticipantId, RegistryStats, SessionOutcome, SessionSummary};
use crate::stats::PlayerStats;
use colored::Colorize;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Write the game banner and command help
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_banner<W: Write>(out: &mut W, max_attempts: u32) -> io::Result<()> {
    writeln!(out, "\n╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                   Wordlik - Guess the Word                   ║")?;
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝\n")?;
    writeln!(out, "You have {max_attempts} attempts. After each guess:")?;
    writeln!(out, "  🟩 letter is in the right spot")?;
    writeln!(out, "  🟨 letter is in the word, elsewhere")?;
    writeln!(out, "  ⬜ letter is not in the word\n")?;
    writeln!(out, "Commands: 'quit', 'new', 'pause', 'resume', 'stats', 'hint'")
}

/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_guess_row<W: Write>(out: &mut W, outcome: &GuessOutcome) -> io::Result<()> {
    writeln!(
        out,
        "\n  {}  {}  {}",
        format!("{}.", outcome.attempt_number).bright_black(),
        colored_row(&outcome.word, &outcome.feedback),
        outcome.feedback.to_emoji()
    )?;
    if !outcome.is_game_ending() {
        writeln!(out, "  {} attempts left", outcome.attempts_remaining)?;
    }
    Ok(())
}

/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_keyboard<W: Write>(out: &mut W, knowledge: &FxHashMap<char, Mark>) -> io::Result<()> {
    writeln!(out)?;
    for line in keyboard(knowledge) {
        writeln!(out, "  {line}")?;
    }
    writeln!(out)
}

/// Result banner for a game that just ended
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_summary<W: Write>(out: &mut W, summary: &SessionSummary) -> io::Result<()> {
    let target = summary.target.to_uppercase();
    match summary.outcome {
        SessionOutcome::Won => {
            writeln!(out, "\n{}", "═".repeat(62).bright_cyan())?;
            writeln!(
                out,
                "{}",
                "      🎉 🎊 ✨  S O L V E D !  ✨ 🎊 🎉".bright_green().bold()
            )?;
            writeln!(out, "{}", "═".repeat(62).bright_cyan())?;
            let verdict = match summary.attempts_used {
                1 => "🏆 Perfect!",
                2 => "⭐ Excellent!",
                3 => "💫 Great!",
                4 => "✨ Good!",
                _ => "👍 Solved!",
            };
            writeln!(out, "\n  {}", verdict.bright_yellow().bold())?;
            writeln!(
                out,
                "  {} in {} {} ({})\n",
                target.bright_white().bold(),
                summary.attempts_used.to_string().bright_cyan().bold(),
                if summary.attempts_used == 1 { "guess" } else { "guesses" },
                format_duration(summary.play_duration)
            )
        }
        SessionOutcome::Lost => writeln!(
            out,
            "\n{} The word was {}.\n",
            "❌ Out of attempts!".red().bold(),
            target.bright_white().bold()
        ),
        SessionOutcome::Abandoned => writeln!(
            out,
            "\n{} The word was {}.",
            "Game abandoned.".yellow(),
            target.bright_white().bold()
        ),
    }
}

/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_player_stats<W: Write>(
    out: &mut W,
    participant: &ParticipantId,
    stats: Option<&PlayerStats>,
) -> io::Result<()> {
    writeln!(out, "\n📊 {}", format!("Statistics for {participant}").bright_cyan().bold())?;
    let Some(stats) = stats else {
        return writeln!(out, "   No finished games yet.");
    };
    writeln!(out, "   Played:           {}", stats.games_played)?;
    writeln!(out, "   Won:              {} ({:.1}%)", stats.games_won, stats.win_rate())?;
    writeln!(out, "   Current streak:   {}", stats.current_streak)?;
    writeln!(out, "   Best streak:      {}", stats.best_streak)?;
    writeln!(out, "   Average attempts: {:.2}", stats.average_attempts())?;
    writeln!(out, "   Hints used:       {}", stats.hints_used)?;
    writeln!(
        out,
        "   Average time:     {}",
        format_duration(stats.average_play_time())
    )?;
    write_distribution(out, &stats.attempts_distribution, stats.games_won)
}

/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_registry_stats<W: Write>(out: &mut W, stats: &RegistryStats) -> io::Result<()> {
    writeln!(out, "\n🌐 {}", "Server:".bright_cyan().bold())?;
    writeln!(out, "   Active games:     {}", stats.active)?;
    writeln!(out, "   Games started:    {}", stats.total_started)?;
    writeln!(out, "   Games won:        {} ({:.1}%)", stats.total_won, stats.win_rate())?;
    writeln!(
        out,
        "   Average game:     {}\n",
        format_duration(stats.average_game_time())
    )
}

fn write_distribution<W: Write>(
    out: &mut W,
    distribution: &BTreeMap<u32, u64>,
    total: u64,
) -> io::Result<()> {
    if distribution.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n📈 {}", "Distribution:".bright_cyan().bold())?;
    for (attempts, &count) in distribution {
        let bar = create_progress_bar(count as f64, total as f64, 40);
        let pct = count as f64 / total as f64 * 100.0;
        writeln!(out, "   {attempts}: {} {count:4} ({pct:5.1}%)", bar.green())?;
    }
    Ok(())
}

/// Print the feedback for one guess/target pair
pub fn print_score_result(result: &ScoreResult) {
    println!(
        "\n  {}  {}  {}",
        colored_row(&result.guess, &result.feedback),
        result.feedback.to_emoji(),
        result.feedback.to_string().bright_black()
    );
    println!(
        "  Against {}: accuracy {}\n",
        result.target.to_uppercase().bright_yellow(),
        format!("{:.1}%", result.accuracy).bright_cyan()
    );
}

/// Print the result of a simulation run
pub fn print_simulation_result(result: &SimulationResult) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(" {} ", "SIMULATION RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    println!("\n📊 {}", "Games:".bright_cyan().bold());
    println!("   Players:          {}", result.players);
    println!("   Games played:     {}", result.games_played);
    println!("   Won:              {}", format!("{}", result.won).green());
    println!("   Lost:             {}", format!("{}", result.lost).red());
    if result.rejected > 0 {
        println!("   Rejected:         {}", format!("{}", result.rejected).yellow());
    }
    println!(
        "   Average attempts: {}",
        format!("{:.2}", result.average_attempts).bright_yellow().bold()
    );
    println!("   Time taken:       {:.2}s", result.duration.as_secs_f64());

    if !result.top_words.is_empty() {
        println!("\n🔁 {}", "Most dealt words:".bright_cyan().bold());
        for (word, count) in &result.top_words {
            println!("   {} × {count}", word.to_uppercase().bright_white());
        }
    }

    let mut stdout = io::stdout().lock();
    // Stdout write failures are not actionable here
    let _ = write_distribution(&mut stdout, &result.distribution, result.won);
    let _ = write_registry_stats(&mut stdout, &result.registry);
}
