//! Score a single guess against a target

use crate::core::{Feedback, Word, WordError};

/// Feedback for one guess/target pair
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub guess: String,
    pub target: String,
    pub feedback: Feedback,
    pub accuracy: f64,
}

/// Compute the feedback `guess` would receive against `target`
///
/// No vocabulary check is applied; any alphabetic words of equal length work.
///
/// # Errors
/// Returns `WordError` if either word is invalid or their lengths differ.
///
/// # Examples
/// ```
/// use wordlik::commands::score_pair;
///
/// let result = score_pair("robot", "floor").unwrap();
/// assert_eq!(result.feedback.to_string(), "YY-G-");
/// ```
pub fn score_pair(guess: &str, target: &str) -> Result<ScoreResult, WordError> {
    let target = Word::new(target)?;
    let guess = Word::with_length(guess, target.len())?;
    let feedback = Feedback::calculate(&guess, &target);

    Ok(ScoreResult {
        accuracy: feedback.accuracy(),
        guess: guess.text().to_string(),
        target: target.text().to_string(),
        feedback,
    })
}
