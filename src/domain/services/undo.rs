//! Undo - derives "undo last action" from the tail of the history.

use crate::domain::entities::{Game, HistorySegment};
use crate::domain::value_objects::GameType;

/// Ledger index of the action undo would remove.
///
/// Basic games undo the newest standalone score change, round games the
/// newest end round. Other segments in between are left alone.
pub fn last_action_index(game: &Game) -> Option<usize> {
    match game.game_type {
        GameType::Basic => game
            .history()
            .last_position_where(HistorySegment::is_score_change),
        GameType::Round => game
            .history()
            .last_position_where(HistorySegment::is_end_round),
    }
}

pub fn last_action(game: &Game) -> Option<&HistorySegment> {
    last_action_index(game).and_then(|index| game.history().get(index))
}

pub fn can_undo(game: &Game) -> bool {
    last_action_index(game).is_some()
}

/// Remove the last action, if any
pub fn undo_last_action(game: &mut Game) -> Option<HistorySegment> {
    let index = last_action_index(game)?;
    game.delete_segment_at(index)
}
