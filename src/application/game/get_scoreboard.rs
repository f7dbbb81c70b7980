use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{Game, GameStatus, HistorySegment};
use crate::domain::repositories::GameRepository;
use crate::domain::services::{can_undo, last_action, progress, ScoreboardProgress};
use crate::domain::value_objects::{EndSettings, GameType, PlayerIcon, SortPreference};

use super::GameCommandError;

/// Player row on the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    pub id: Uuid,
    pub name: String,
    pub icon: PlayerIcon,
    pub position: usize,
    pub score: i64,
}

/// Everything a scoreboard screen renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardView {
    pub id: Uuid,
    pub name: String,
    pub game_type: GameType,
    pub status: GameStatus,
    pub settings: EndSettings,
    pub current_round: u32,
    pub is_end_of_game: bool,
    pub sort_preference: SortPreference,
    pub players: Vec<PlayerStanding>,
    pub winning_player_ids: Vec<Uuid>,
    pub can_undo: bool,
    pub last_action: Option<HistorySegment>,
    pub progress: ScoreboardProgress,
}

impl ScoreboardView {
    pub fn from_game(game: &Game, sort_preference: SortPreference) -> Self {
        let players = game
            .sorted_players(sort_preference)
            .into_iter()
            .map(|p| PlayerStanding {
                id: p.id,
                name: p.name.clone(),
                icon: p.icon,
                position: p.position,
                score: game.score_of(p.id),
            })
            .collect();

        Self {
            id: game.id,
            name: game.name.clone(),
            game_type: game.game_type,
            status: game.status,
            settings: game.settings,
            current_round: game.current_round(),
            is_end_of_game: game.is_end_of_game(),
            sort_preference,
            players,
            winning_player_ids: game.winning_players().iter().map(|p| p.id).collect(),
            can_undo: can_undo(game),
            last_action: last_action(game).cloned(),
            progress: progress(game),
        }
    }
}

/// Get scoreboard use case
pub struct GetScoreboard<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> GetScoreboard<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        game_id: Uuid,
        sort_preference: SortPreference,
    ) -> Result<ScoreboardView, GameCommandError> {
        let game = self
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(GameCommandError::GameNotFound)?;

        Ok(ScoreboardView::from_game(&game, sort_preference))
    }
}
