mod game_repo;
mod in_memory_game_repo;

pub use game_repo::*;
pub use in_memory_game_repo::*;
