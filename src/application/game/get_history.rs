use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::HistoryEntry;
use crate::domain::repositories::GameRepository;

use super::GameCommandError;

/// Resolved history of a game, oldest first
pub struct GetHistory<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> GetHistory<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: Uuid) -> Result<Vec<HistoryEntry>, GameCommandError> {
        let game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(GameCommandError::GameNotFound)?;

        Ok(game.history_entries())
    }
}
