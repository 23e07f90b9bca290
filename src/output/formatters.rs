//! Formatting utilities for terminal output

use crate::core::{Feedback, Mark};
use colored::{ColoredString, Colorize};
use rustc_hash::FxHashMap;

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Paint one letter according to its mark
#[must_use]
pub fn paint_letter(letter: char, mark: Mark) -> ColoredString {
    let tile = format!(" {} ", letter.to_uppercase());
    match mark {
        Mark::Correct => tile.black().on_green().bold(),
        Mark::Present => tile.black().on_yellow().bold(),
        Mark::Absent => tile.white().on_bright_black(),
    }
}

/// Render a guess as a row of coloured tiles
#[must_use]
pub fn colored_row(word: &str, feedback: &Feedback) -> String {
    word.chars()
        .zip(feedback.marks())
        .map(|(letter, &mark)| paint_letter(letter, mark).to_string())
        .collect()
}

/// Plain-text row: upper-case word followed by its emoji squares
#[must_use]
pub fn plain_row(word: &str, feedback: &Feedback) -> String {
    format!("{} {}", word.to_uppercase(), feedback.to_emoji())
}

/// Render the letter knowledge as a QWERTY keyboard
///
/// Letters outside the QWERTY rows (accented letters) are listed on an
/// extra line once they have been seen.
#[must_use]
pub fn keyboard(knowledge: &FxHashMap<char, Mark>) -> Vec<String> {
    let key = |letter: char| match knowledge.get(&letter) {
        Some(&mark) => paint_letter(letter, mark).to_string(),
        None => format!(" {} ", letter.to_uppercase()),
    };

    let mut lines: Vec<String> = KEYBOARD_ROWS
        .iter()
        .map(|row| row.chars().map(key).collect())
        .collect();

    let mut extra: Vec<char> = knowledge
        .keys()
        .copied()
        .filter(|c| !KEYBOARD_ROWS.iter().any(|row| row.contains(*c)))
        .collect();
    if !extra.is_empty() {
        extra.sort_unstable();
        lines.push(extra.into_iter().map(key).collect());
    }
    lines
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Human-readable duration such as `1h 02m 05s`
#[must_use]
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
