use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Game, GameStatus};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Process-local GameRepository, used by tests and previews
#[derive(Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<Uuid, Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, RepositoryError> {
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn find_active(&self) -> Result<Option<Game>, RepositoryError> {
        let games = self.games.read().await;
        Ok(games
            .values()
            .filter(|g| g.status == GameStatus::Active)
            .max_by_key(|g| g.updated_at)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Game>, RepositoryError> {
        let games = self.games.read().await;
        let mut all: Vec<Game> = games.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn save(&self, game: &Game) -> Result<(), RepositoryError> {
        self.games.write().await.insert(game.id, game.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        match self.games.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(format!("game {}", id))),
        }
    }
}
