use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{EndRound, ScoreChange};
use crate::domain::repositories::GameRepository;

use super::{update_game, GameCommandError, GameUpdate};

/// Overwrite a standalone score change
pub struct EditScoreChange<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> EditScoreChange<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: Uuid,
        score_change: ScoreChange,
    ) -> Result<GameUpdate<()>, GameCommandError> {
        let score_change_id = score_change.id;
        let update = update_game(self.game_repo.as_ref(), game_id, |game| {
            game.edit_score_change(score_change)
        })
        .await?;

        tracing::debug!(game_id = %game_id, score_change_id = %score_change_id, "Edited score change");
        Ok(update)
    }
}

/// Overwrite the lines of a closed round
pub struct EditEndRound<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> EditEndRound<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: Uuid,
        end_round: EndRound,
    ) -> Result<GameUpdate<()>, GameCommandError> {
        let end_round_id = end_round.id;
        let update = update_game(self.game_repo.as_ref(), game_id, |game| {
            game.edit_end_round(end_round)
        })
        .await?;

        tracing::debug!(game_id = %game_id, end_round_id = %end_round_id, "Edited end round");
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Game, HistorySegment};
    use crate::domain::errors::GameError;
    use crate::domain::value_objects::{EndSettings, GameType, PlayerIcon, PlayerSettings};
    use crate::infrastructure::database::repositories::InMemoryGameRepository;

    async fn setup() -> (Arc<InMemoryGameRepository>, Game) {
        let repo = Arc::new(InMemoryGameRepository::new());
        let mut game = Game::new("Hearts", GameType::Round, EndSettings::default()).with_players(&[
            PlayerSettings::new("A", PlayerIcon::Cat),
            PlayerSettings::new("B", PlayerIcon::Dog),
        ]);
        let a = game.players().as_slice()[0].id;
        let b = game.players().as_slice()[1].id;
        game.record_score_change(a, 2).unwrap();
        game.record_end_round(&[(a, 5), (b, 7)]).unwrap();
        repo.save(&game).await.unwrap();
        (repo, game)
    }

    #[tokio::test]
    async fn test_edit_score_change() {
        let (repo, game) = setup().await;
        let a = game.players().as_slice()[0].id;
        let HistorySegment::ScoreChange(original) = &game.history().segments()[0] else {
            panic!("expected a score change");
        };

        let update = EditScoreChange::new(repo.clone())
            .execute(game.id, original.with_delta(-3))
            .await
            .unwrap();

        assert_eq!(update.game.score_of(a), 2);
        assert_eq!(repo.find_by_id(game.id).await.unwrap().unwrap().score_of(a), 2);
    }

    #[tokio::test]
    async fn test_edit_end_round_keeps_round_number() {
        let (repo, game) = setup().await;
        let b = game.players().as_slice()[1].id;
        let HistorySegment::EndRound(original) = &game.history().segments()[1] else {
            panic!("expected an end round");
        };

        let mut edited = original.clone();
        edited.round_number = 9;
        for line in &mut edited.score_changes {
            line.delta *= 2;
        }

        let update = EditEndRound::new(repo).execute(game.id, edited).await.unwrap();
        let stored = update.game.history().end_rounds().next().unwrap();
        assert_eq!(stored.round_number, 1);
        assert_eq!(update.game.score_of(b), 14);
    }

    #[tokio::test]
    async fn test_edit_unknown_end_round() {
        let (repo, game) = setup().await;
        let result = EditEndRound::new(repo)
            .execute(game.id, EndRound::new(1, Vec::new()))
            .await;
        assert!(matches!(
            result,
            Err(GameCommandError::Game(GameError::EndRoundNotFound(_)))
        ));
    }
}
