mod change_status;
mod create_game;
mod delete_game;
mod list_games;
mod play_again;

pub use change_status::*;
pub use create_game::*;
pub use delete_game::*;
pub use list_games::*;
pub use play_again::*;

use crate::domain::repositories::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum GameLibraryError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
