//! Terminal output formatting
//!
//! Display utilities for the interactive game and CLI results.

pub mod display;
pub mod formatters;

pub use display::{print_score_result, print_simulation_result};
