use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::EndRound;
use crate::domain::repositories::GameRepository;

use super::{update_game, GameCommandError, GameUpdate};

/// One player's score for the round being closed
#[derive(Debug, Clone, Copy)]
pub struct RoundScore {
    pub player_id: Uuid,
    pub delta: i32,
}

/// Record end round input
pub struct RecordEndRoundInput {
    pub game_id: Uuid,
    pub scores: Vec<RoundScore>,
}

/// Close the current round with a batch of scores
pub struct RecordEndRound<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> RecordEndRound<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: RecordEndRoundInput,
    ) -> Result<GameUpdate<EndRound>, GameCommandError> {
        let batch: Vec<(Uuid, i32)> = input
            .scores
            .iter()
            .map(|score| (score.player_id, score.delta))
            .collect();

        let update = update_game(self.game_repo.as_ref(), input.game_id, |game| {
            game.record_end_round(&batch)
        })
        .await?;

        tracing::info!(
            game_id = %input.game_id,
            round = update.outcome.round_number,
            "Round ended"
        );

        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Game;
    use crate::domain::errors::GameError;
    use crate::domain::value_objects::{EndSettings, GameEndType, GameType, PlayerIcon, PlayerSettings};
    use crate::infrastructure::database::repositories::InMemoryGameRepository;

    async fn setup() -> (Arc<InMemoryGameRepository>, Game) {
        let repo = Arc::new(InMemoryGameRepository::new());
        let end = EndSettings::new(GameEndType::RoundCount).with_end_quantity(GameType::Round, 2);
        let game = Game::new("Rummy", GameType::Round, end).with_players(&[
            PlayerSettings::new("A", PlayerIcon::Cat),
            PlayerSettings::new("B", PlayerIcon::Dog),
        ]);
        repo.save(&game).await.unwrap();
        (repo, game)
    }

    fn scores(game: &Game, deltas: &[i32]) -> Vec<RoundScore> {
        game.players()
            .iter()
            .zip(deltas)
            .map(|(p, delta)| RoundScore { player_id: p.id, delta: *delta })
            .collect()
    }

    #[tokio::test]
    async fn test_rounds_advance_until_end() {
        let (repo, game) = setup().await;
        let use_case = RecordEndRound::new(repo.clone());

        let first = use_case
            .execute(RecordEndRoundInput { game_id: game.id, scores: scores(&game, &[3, 5]) })
            .await
            .unwrap();
        assert_eq!(first.outcome.round_number, 1);
        assert_eq!(first.game.current_round(), 2);
        assert!(!first.is_end_of_game);

        let second = use_case
            .execute(RecordEndRoundInput { game_id: game.id, scores: scores(&game, &[4, 1]) })
            .await
            .unwrap();
        assert_eq!(second.outcome.round_number, 2);
        assert!(second.is_end_of_game);

        let stored = repo.find_by_id(game.id).await.unwrap().unwrap();
        assert_eq!(stored.current_round(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_player_is_rejected() {
        let (repo, game) = setup().await;
        let a = game.players().as_slice()[0].id;

        let result = RecordEndRound::new(repo.clone())
            .execute(RecordEndRoundInput {
                game_id: game.id,
                scores: vec![RoundScore { player_id: a, delta: 1 }, RoundScore { player_id: a, delta: 2 }],
            })
            .await;

        assert!(matches!(
            result,
            Err(GameCommandError::Game(GameError::DuplicatePlayerInRound(_)))
        ));
        assert_eq!(repo.find_by_id(game.id).await.unwrap().unwrap().current_round(), 1);
    }
}
