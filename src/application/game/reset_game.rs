use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repositories::GameRepository;

use super::{update_game, GameCommandError, GameUpdate};

/// Clear all scores of a game, keeping roster and settings
pub struct ResetGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> ResetGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: Uuid) -> Result<GameUpdate<usize>, GameCommandError> {
        let update = update_game(self.game_repo.as_ref(), game_id, |game| {
            let cleared = game.history().len();
            game.reset();
            Ok(cleared)
        })
        .await?;

        tracing::info!(game_id = %game_id, cleared = update.outcome, "Game reset");
        Ok(update)
    }
}
