use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single adjustment to one player's score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub id: Uuid,
    pub player_id: Uuid,
    pub delta: i32,
}

impl ScoreChange {
    /// Create a new score change for a player
    pub fn new(player_id: Uuid, delta: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            delta,
        }
    }

    /// Copy of this change carrying a different delta, same identity
    pub fn with_delta(&self, delta: i32) -> Self {
        Self {
            delta,
            ..self.clone()
        }
    }
}
