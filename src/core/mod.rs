//! Core domain types for the word game
//!
//! This module contains the pure building blocks: validated words and the
//! positional feedback produced by scoring a guess against a target.
//! Nothing here holds state between calls.

mod feedback;
mod word;

pub use feedback::{Feedback, FeedbackParseError, Mark};
pub use word::{Word, WordError};
