use uuid::Uuid;

use crate::application::library::{
    CompleteGame, CreateGame, CreateGameInput, DeleteGame, GetActiveGame, ListGames, PlayAgain,
    ReopenGame, StartQuickGame,
};
use crate::domain::entities::Game;
use crate::infrastructure::app_state::{ScoreboardEvent, ScoreboardEventKind};

use super::{ScoreboardApi, ScoreboardError};

impl ScoreboardApi {
    pub async fn create_game(&self, input: CreateGameInput) -> Result<Game, ScoreboardError> {
        let game = CreateGame::new(self.state().game_repo.clone())
            .execute(input)
            .await?;
        self.game_created(&game);
        Ok(game)
    }

    pub async fn start_quick_game(&self) -> Result<Game, ScoreboardError> {
        let game = StartQuickGame::new(self.state().game_repo.clone())
            .execute()
            .await?;
        self.game_created(&game);
        Ok(game)
    }

    /// New game with the roster and settings of `game_id`
    pub async fn play_again(&self, game_id: Uuid) -> Result<Game, ScoreboardError> {
        let game = PlayAgain::new(self.state().game_repo.clone())
            .execute(game_id)
            .await?;

        // Carry the scoreboard order over to the new game
        let preference = self.sort_preference(game_id).await;
        self.state()
            .sort_preferences
            .write()
            .await
            .insert(game.id, preference);

        self.game_created(&game);
        Ok(game)
    }

    /// Mark a game completed. A pending game over signal is dropped.
    pub async fn end_game(&self, game_id: Uuid) -> Result<Game, ScoreboardError> {
        let game = CompleteGame::new(self.state().game_repo.clone())
            .execute(game_id)
            .await?;
        self.status_changed(&game);
        Ok(game)
    }

    pub async fn reopen_game(&self, game_id: Uuid) -> Result<Game, ScoreboardError> {
        let game = ReopenGame::new(self.state().game_repo.clone())
            .execute(game_id)
            .await?;
        self.status_changed(&game);
        Ok(game)
    }

    pub async fn delete_game(&self, game_id: Uuid) -> Result<(), ScoreboardError> {
        DeleteGame::new(self.state().game_repo.clone())
            .execute(game_id)
            .await?;

        self.state().game_over.cancel(game_id);
        self.state().sort_preferences.write().await.remove(&game_id);
        self.state().broadcast_event(ScoreboardEvent::new(
            ScoreboardEventKind::GameDeleted,
            Some(game_id),
        ));
        Ok(())
    }

    /// The game to resume: the most recently updated active one
    pub async fn active_game(&self) -> Result<Option<Game>, ScoreboardError> {
        let game = GetActiveGame::new(self.state().game_repo.clone())
            .execute()
            .await?;
        Ok(game)
    }

    pub async fn list_games(&self) -> Result<Vec<Game>, ScoreboardError> {
        let games = ListGames::new(self.state().game_repo.clone())
            .execute()
            .await?;
        Ok(games)
    }

    fn game_created(&self, game: &Game) {
        self.state().broadcast_event(
            ScoreboardEvent::new(ScoreboardEventKind::GameCreated, Some(game.id))
                .with_data(serde_json::json!({ "name": game.name })),
        );
    }

    fn status_changed(&self, game: &Game) {
        self.state().broadcast_event(
            ScoreboardEvent::new(ScoreboardEventKind::GameStatusChanged, Some(game.id))
                .with_data(serde_json::json!({ "status": game.status })),
        );
        self.reconcile_game_over(game);
    }
}
