use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repositories::{GameRepository, RepositoryError};

use super::GameLibraryError;

/// Delete game use case
pub struct DeleteGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> DeleteGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: Uuid) -> Result<(), GameLibraryError> {
        self.game_repo.delete(game_id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => GameLibraryError::GameNotFound,
            other => GameLibraryError::Repository(other),
        })?;

        tracing::info!(game_id = %game_id, "Deleted game");
        Ok(())
    }
}
