use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repositories::GameRepository;
use crate::domain::value_objects::{EndSettings, GameEndType};

use super::{update_game, GameCommandError, GameUpdate};

/// Update settings input
pub struct UpdateSettingsInput {
    pub game_id: Uuid,
    pub game_end_type: GameEndType,
    pub ending_score: i32,
    pub number_of_rounds: u32,
}

/// Change how a game ends, mid-game included
pub struct UpdateSettings<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> UpdateSettings<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: UpdateSettingsInput,
    ) -> Result<GameUpdate<EndSettings>, GameCommandError> {
        let update = update_game(self.game_repo.as_ref(), input.game_id, |game| {
            game.update_settings(input.game_end_type, input.ending_score, input.number_of_rounds);
            Ok(game.settings)
        })
        .await?;

        tracing::info!(
            game_id = %input.game_id,
            end_type = input.game_end_type.as_str(),
            ending_score = input.ending_score,
            number_of_rounds = input.number_of_rounds,
            "Updated end settings"
        );

        Ok(update)
    }
}
