use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::Game;
use crate::domain::repositories::GameRepository;

use super::GameLibraryError;

/// Start a fresh game with the roster and settings of an existing one
pub struct PlayAgain<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> PlayAgain<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: Uuid) -> Result<Game, GameLibraryError> {
        let source = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(GameLibraryError::GameNotFound)?;

        let game = source.duplicate();
        self.game_repo.save(&game).await?;

        tracing::info!(source_id = %game_id, game_id = %game.id, "Playing again");
        Ok(game)
    }
}
