//! Per-session game state machine
//!
//! A [`GameState`] owns one participant's game: the hidden target, the guess
//! history and the accumulated letter knowledge. It scores guesses with
//! [`Feedback::calculate`](crate::core::Feedback::calculate) and moves from
//! `InProgress` to a terminal `Won` or `Lost` state. It never touches the
//! registry, statistics or presentation.

mod outcome;
mod state;

pub use outcome::{GuessError, GuessOutcome, GuessRecord};
pub use state::{DEFAULT_MAX_ATTEMPTS, GameState, GameStatus};
