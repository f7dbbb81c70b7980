use crate::application::game::GameCommandError;
use crate::application::library::GameLibraryError;
use crate::domain::errors::GameError;
use crate::domain::repositories::RepositoryError;

/// Errors handed to the presentation layer
#[derive(Debug, thiserror::Error)]
pub enum ScoreboardError {
    #[error("Game not found")]
    GameNotFound,
    /// The request referenced something that is not part of the game
    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] GameError),
    /// Saving or loading failed; the in-memory change was not kept
    #[error("Persistence failure: {message}")]
    Persistence { message: String },
}

impl From<RepositoryError> for ScoreboardError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(_) => ScoreboardError::GameNotFound,
            other => {
                tracing::error!("Persistence failure: {}", other);
                ScoreboardError::Persistence {
                    message: other.to_string(),
                }
            }
        }
    }
}

impl From<GameCommandError> for ScoreboardError {
    fn from(e: GameCommandError) -> Self {
        match e {
            GameCommandError::GameNotFound => ScoreboardError::GameNotFound,
            GameCommandError::Game(e) => ScoreboardError::InvalidOperation(e),
            GameCommandError::Repository(e) => e.into(),
        }
    }
}

impl From<GameLibraryError> for ScoreboardError {
    fn from(e: GameLibraryError) -> Self {
        match e {
            GameLibraryError::GameNotFound => ScoreboardError::GameNotFound,
            GameLibraryError::Repository(e) => e.into(),
        }
    }
}
