use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::entities::Game;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// SQLite implementation of GameRepository.
///
/// Each game is one row; the aggregate itself is stored as JSON next to the
/// columns used for listing.
pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for direct queries
    pub fn get_db(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the games table if it does not exist yet
    pub async fn init_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS games (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                status TEXT NOT NULL,
                game_json TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_games_status_updated ON games (status, updated_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_game(row: &sqlx::sqlite::SqliteRow) -> Result<Game, RepositoryError> {
        use sqlx::Row;

        let id: String = row.get("id");
        let game_json: String = row.get("game_json");

        let game: Game = serde_json::from_str(&game_json)
            .map_err(|e| RepositoryError::Serialization(format!("game {}: {}", id, e)))?;

        // Refuse to hand out a game whose history no longer adds up
        game.check_invariants().map_err(|e| {
            tracing::error!("Stored game {} is corrupt: {}", id, e);
            RepositoryError::Serialization(format!("game {}: {}", id, e))
        })?;

        Ok(game)
    }
}

#[async_trait]
impl GameRepository for SqliteGameRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, RepositoryError> {
        let row = sqlx::query("SELECT id, game_json FROM games WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.as_ref().map(Self::row_to_game).transpose()
    }

    async fn find_active(&self) -> Result<Option<Game>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, game_json FROM games WHERE status = 'active' ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.as_ref().map(Self::row_to_game).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Game>, RepositoryError> {
        let rows = sqlx::query("SELECT id, game_json FROM games ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(Self::row_to_game).collect()
    }

    async fn save(&self, game: &Game) -> Result<(), RepositoryError> {
        let game_json = serde_json::to_string(game)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO games (id, name, status, game_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                status = excluded.status,
                game_json = excluded.game_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(game.id.to_string())
        .bind(game.name.as_str())
        .bind(game.status.as_str())
        .bind(game_json.as_str())
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("game {}", id)));
        }

        Ok(())
    }
}
