//! Command implementations

pub mod play;
pub mod score;
pub mod simulate;

pub use play::{play_session, run_play};
pub use score::{ScoreResult, score_pair};
pub use simulate::{SimulationConfig, SimulationResult, run_simulation};
