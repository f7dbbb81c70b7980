use std::sync::Arc;

use crate::domain::entities::Game;
use crate::domain::repositories::GameRepository;

use super::GameLibraryError;

/// The game to resume on launch: the most recently updated active one
pub struct GetActiveGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> GetActiveGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self) -> Result<Option<Game>, GameLibraryError> {
        Ok(self.game_repo.find_active().await?)
    }
}

/// All games, most recently updated first
pub struct ListGames<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> ListGames<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self) -> Result<Vec<Game>, GameLibraryError> {
        let games = self.game_repo.find_all().await?;
        tracing::debug!("Listed {} games", games.len());
        Ok(games)
    }
}
