use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Game;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Game repository trait
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Find game by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, RepositoryError>;

    /// Most recently updated active game
    async fn find_active(&self) -> Result<Option<Game>, RepositoryError>;

    /// All games, most recently updated first
    async fn find_all(&self) -> Result<Vec<Game>, RepositoryError>;

    /// Save game (create or update)
    async fn save(&self, game: &Game) -> Result<(), RepositoryError>;

    /// Delete game
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
