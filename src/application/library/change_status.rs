use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Game, GameStatus};
use crate::domain::repositories::GameRepository;

use super::GameLibraryError;

async fn set_status<R: GameRepository + ?Sized>(
    repo: &R,
    game_id: Uuid,
    status: GameStatus,
) -> Result<Game, GameLibraryError> {
    let mut game = repo
        .find_by_id(game_id)
        .await?
        .ok_or(GameLibraryError::GameNotFound)?;

    match status {
        GameStatus::Active => game.reopen(),
        GameStatus::Completed => game.complete(),
    }
    game.touch();
    repo.save(&game).await?;

    tracing::info!(game_id = %game_id, status = status.as_str(), "Game status changed");
    Ok(game)
}

/// Mark a game as completed
pub struct CompleteGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> CompleteGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: Uuid) -> Result<Game, GameLibraryError> {
        set_status(self.game_repo.as_ref(), game_id, GameStatus::Completed).await
    }
}

/// Make a completed game active again
pub struct ReopenGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> ReopenGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, game_id: Uuid) -> Result<Game, GameLibraryError> {
        set_status(self.game_repo.as_ref(), game_id, GameStatus::Active).await
    }
}
