use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::HistorySegment;
use crate::domain::repositories::GameRepository;
use crate::domain::services::undo_last_action;

use super::{try_update_game, GameCommandError, GameUpdate};

/// Remove the most recent undoable action of a game
pub struct UndoLastAction<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> UndoLastAction<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    /// `Ok(None)` when there is nothing to undo
    pub async fn execute(
        &self,
        game_id: Uuid,
    ) -> Result<Option<GameUpdate<HistorySegment>>, GameCommandError> {
        let update = try_update_game(self.game_repo.as_ref(), game_id, |game| {
            Ok(undo_last_action(game))
        })
        .await?;

        match &update {
            Some(update) => {
                tracing::info!(game_id = %game_id, segment_id = %update.outcome.id(), "Undid last action")
            }
            None => tracing::debug!(game_id = %game_id, "Nothing to undo"),
        }

        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Game;
    use crate::domain::value_objects::{EndSettings, GameType, PlayerIcon, PlayerSettings};
    use crate::infrastructure::database::repositories::InMemoryGameRepository;

    fn players() -> [PlayerSettings; 2] {
        [
            PlayerSettings::new("A", PlayerIcon::Cat),
            PlayerSettings::new("B", PlayerIcon::Dog),
        ]
    }

    #[tokio::test]
    async fn test_round_game_undoes_last_round_only() {
        let repo = Arc::new(InMemoryGameRepository::new());
        let mut game = Game::new("Rummy", GameType::Round, EndSettings::default()).with_players(&players());
        let a = game.players().as_slice()[0].id;
        let b = game.players().as_slice()[1].id;
        game.record_end_round(&[(a, 1), (b, 1)]).unwrap();
        game.record_score_change(a, 10).unwrap();
        repo.save(&game).await.unwrap();

        let update = UndoLastAction::new(repo.clone()).execute(game.id).await.unwrap().unwrap();

        assert!(update.outcome.is_end_round());
        assert_eq!(update.game.current_round(), 1);
        assert_eq!(update.game.score_of(a), 10);
        assert_eq!(update.game.history().len(), 1);
    }

    #[tokio::test]
    async fn test_nothing_to_undo() {
        let repo = Arc::new(InMemoryGameRepository::new());
        let game = Game::new("Quick", GameType::Basic, EndSettings::default()).with_players(&players());
        repo.save(&game).await.unwrap();

        let update = UndoLastAction::new(repo.clone()).execute(game.id).await.unwrap();
        assert!(update.is_none());
        assert_eq!(repo.find_by_id(game.id).await.unwrap().unwrap().updated_at, game.updated_at);
    }
}
