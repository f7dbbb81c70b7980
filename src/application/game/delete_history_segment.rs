use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::HistorySegment;
use crate::domain::repositories::GameRepository;

use super::{try_update_game, GameCommandError, GameUpdate};

/// Delete the history segment at a ledger index
pub struct DeleteHistorySegment<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> DeleteHistorySegment<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    /// `Ok(None)` when `index` is out of range
    pub async fn execute(
        &self,
        game_id: Uuid,
        index: usize,
    ) -> Result<Option<GameUpdate<HistorySegment>>, GameCommandError> {
        let update = try_update_game(self.game_repo.as_ref(), game_id, |game| {
            Ok(game.delete_segment_at(index))
        })
        .await?;

        if let Some(update) = &update {
            tracing::debug!(
                game_id = %game_id,
                index,
                segment_id = %update.outcome.id(),
                "Deleted history segment"
            );
        }

        Ok(update)
    }
}
