use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ScoreChange;

/// Scores entered for several players at the close of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndRound {
    pub id: Uuid,
    /// 1-based, dense across the surviving end rounds of a game
    pub round_number: u32,
    pub score_changes: Vec<ScoreChange>,
}

impl EndRound {
    pub fn new(round_number: u32, score_changes: Vec<ScoreChange>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round_number,
            score_changes,
        }
    }

    /// Find a line of this round by score change id
    pub fn score_change(&self, id: Uuid) -> Option<&ScoreChange> {
        self.score_changes.iter().find(|sc| sc.id == id)
    }

    /// Line recorded for a player in this round
    pub fn score_change_for(&self, player_id: Uuid) -> Option<&ScoreChange> {
        self.score_changes.iter().find(|sc| sc.player_id == player_id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.score_changes.iter().map(|sc| sc.player_id)
    }

    /// Drop a player's line, returning whether one was removed
    pub fn remove_player(&mut self, player_id: Uuid) -> bool {
        let before = self.score_changes.len();
        self.score_changes.retain(|sc| sc.player_id != player_id);
        self.score_changes.len() != before
    }
}
