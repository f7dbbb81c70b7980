mod error;
mod library;
mod scoreboard;

pub use error::*;
pub use scoreboard::*;

// Re-export for convenience
pub use crate::infrastructure::app_state::{AppState, ScoreboardEvent, ScoreboardEventKind};
