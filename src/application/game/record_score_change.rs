use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::ScoreChange;
use crate::domain::repositories::GameRepository;

use super::{update_game, GameCommandError, GameUpdate};

/// Record score change input
pub struct RecordScoreChangeInput {
    pub game_id: Uuid,
    pub player_id: Uuid,
    pub delta: i32,
}

/// Record a standalone score adjustment for one player
pub struct RecordScoreChange<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> RecordScoreChange<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: RecordScoreChangeInput,
    ) -> Result<GameUpdate<ScoreChange>, GameCommandError> {
        let update = update_game(self.game_repo.as_ref(), input.game_id, |game| {
            game.record_score_change(input.player_id, input.delta)
        })
        .await?;

        tracing::debug!(
            game_id = %input.game_id,
            player_id = %input.player_id,
            delta = input.delta,
            "Recorded score change"
        );

        Ok(update)
    }
}
