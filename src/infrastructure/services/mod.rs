mod game_over_scheduler;

pub use game_over_scheduler::*;
