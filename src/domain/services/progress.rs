use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Game;
use crate::domain::value_objects::{GameEndType, GameType};

/// How far the game is from its end condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScoreboardProgress {
    /// Basic games show no progress
    Hidden,
    /// No end condition, or no round has been played yet
    EnterScores,
    GameOver,
    RoundsLeft { rounds: u32 },
    LastRound,
    /// Points the leader(s) still need to reach the winning score
    PointsToWin { leaders: Vec<Uuid>, points: i64 },
}

pub fn progress(game: &Game) -> ScoreboardProgress {
    if game.game_type != GameType::Round {
        return ScoreboardProgress::Hidden;
    }

    if game.settings.game_end_type == GameEndType::None || game.current_round() == 1 {
        return ScoreboardProgress::EnterScores;
    }

    if game.is_end_of_game() {
        return ScoreboardProgress::GameOver;
    }

    match game.settings.game_end_type {
        GameEndType::RoundCount => {
            let played = game.current_round() - 1;
            let rounds = game.settings.number_of_rounds.saturating_sub(played);
            if rounds > 1 {
                ScoreboardProgress::RoundsLeft { rounds }
            } else {
                ScoreboardProgress::LastRound
            }
        }
        GameEndType::ScoreThreshold => {
            let leaders = game.winning_players();
            let best = leaders
                .first()
                .map(|p| game.score_of(p.id))
                .unwrap_or_default();
            ScoreboardProgress::PointsToWin {
                leaders: leaders.iter().map(|p| p.id).collect(),
                points: i64::from(game.settings.ending_score) - best,
            }
        }
        GameEndType::None => ScoreboardProgress::EnterScores,
    }
}
