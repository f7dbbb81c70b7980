use std::sync::Arc;

use async_broadcast::Receiver;
use uuid::Uuid;

use crate::application::game::{
    DeleteHistorySegment, EditEndRound, EditScoreChange, GameUpdate, GetHistory, GetScoreboard,
    ManagePlayers, PlayerCommand, PlayerCommandOutcome, RecordEndRound, RecordEndRoundInput,
    RecordScoreChange, RecordScoreChangeInput, ResetGame, RoundScore, ScoreboardView,
    UndoLastAction, UpdateSettings, UpdateSettingsInput,
};
use crate::domain::entities::{EndRound, Game, GameStatus, HistoryEntry, HistorySegment, ScoreChange};
use crate::domain::repositories::GameRepository;
use crate::domain::value_objects::{EndSettings, GameEndType, SortPreference};
use crate::infrastructure::app_state::{AppState, ScoreboardEvent, ScoreboardEventKind};

use super::ScoreboardError;

/// In-process surface for a scoreboard front end.
///
/// Every mutating call saves the game, broadcasts a [`ScoreboardEvent`] and
/// then re-evaluates the deferred game over signal for that game.
///
/// Each mutating call loads the whole game, applies one change and saves it
/// back. Calls are not serialized against each other: a front end must issue
/// at most one mutating call per game at a time and await it before the
/// next, or a concurrent save may overwrite an earlier one. Clones share the
/// same state and the same contract.
#[derive(Clone)]
pub struct ScoreboardApi {
    state: Arc<AppState>,
}

impl ScoreboardApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> Receiver<ScoreboardEvent> {
        self.state.subscribe()
    }

    // ========== Reading ==========

    /// Load a game for display and surface its game over signal if it is
    /// already finished
    pub async fn open_game(&self, game_id: Uuid) -> Result<ScoreboardView, ScoreboardError> {
        let game = self.load(game_id).await?;
        tracing::debug!(game_id = %game_id, "Opened game '{}'", game.name);

        self.reconcile_game_over(&game);
        let preference = self.sort_preference(game_id).await;
        Ok(ScoreboardView::from_game(&game, preference))
    }

    pub async fn scoreboard(&self, game_id: Uuid) -> Result<ScoreboardView, ScoreboardError> {
        let preference = self.sort_preference(game_id).await;
        let view = GetScoreboard::new(self.state.game_repo.clone())
            .execute(game_id, preference)
            .await?;
        Ok(view)
    }

    pub async fn history(&self, game_id: Uuid) -> Result<Vec<HistoryEntry>, ScoreboardError> {
        let entries = GetHistory::new(self.state.game_repo.clone())
            .execute(game_id)
            .await?;
        Ok(entries)
    }

    pub async fn sort_preference(&self, game_id: Uuid) -> SortPreference {
        self.state
            .sort_preferences
            .read()
            .await
            .get(&game_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set_sort_preference(
        &self,
        game_id: Uuid,
        preference: SortPreference,
    ) -> Result<ScoreboardView, ScoreboardError> {
        let game = self.load(game_id).await?;
        self.state
            .sort_preferences
            .write()
            .await
            .insert(game_id, preference);

        self.state.broadcast_event(
            ScoreboardEvent::new(ScoreboardEventKind::SortPreferenceChanged, Some(game_id))
                .with_data(serde_json::json!({ "sortPreference": preference })),
        );
        Ok(ScoreboardView::from_game(&game, preference))
    }

    // ========== Scoring ==========

    pub async fn record_score_change(
        &self,
        game_id: Uuid,
        player_id: Uuid,
        delta: i32,
    ) -> Result<ScoreChange, ScoreboardError> {
        let update = RecordScoreChange::new(self.state.game_repo.clone())
            .execute(RecordScoreChangeInput {
                game_id,
                player_id,
                delta,
            })
            .await?;
        Ok(self.history_changed(update, "scoreChange"))
    }

    pub async fn record_end_round(
        &self,
        game_id: Uuid,
        scores: Vec<RoundScore>,
    ) -> Result<EndRound, ScoreboardError> {
        let update = RecordEndRound::new(self.state.game_repo.clone())
            .execute(RecordEndRoundInput { game_id, scores })
            .await?;
        Ok(self.history_changed(update, "endRound"))
    }

    pub async fn edit_score_change(
        &self,
        game_id: Uuid,
        score_change: ScoreChange,
    ) -> Result<(), ScoreboardError> {
        let update = EditScoreChange::new(self.state.game_repo.clone())
            .execute(game_id, score_change)
            .await?;
        self.history_changed(update, "editScoreChange");
        Ok(())
    }

    pub async fn edit_end_round(
        &self,
        game_id: Uuid,
        end_round: EndRound,
    ) -> Result<(), ScoreboardError> {
        let update = EditEndRound::new(self.state.game_repo.clone())
            .execute(game_id, end_round)
            .await?;
        self.history_changed(update, "editEndRound");
        Ok(())
    }

    /// Delete the segment at `index`; `None` when out of range
    pub async fn delete_history_segment(
        &self,
        game_id: Uuid,
        index: usize,
    ) -> Result<Option<HistorySegment>, ScoreboardError> {
        let update = DeleteHistorySegment::new(self.state.game_repo.clone())
            .execute(game_id, index)
            .await?;
        Ok(update.map(|update| self.history_changed(update, "delete")))
    }

    /// Undo the last action; `None` when there is nothing to undo
    pub async fn undo(&self, game_id: Uuid) -> Result<Option<HistorySegment>, ScoreboardError> {
        let update = UndoLastAction::new(self.state.game_repo.clone())
            .execute(game_id)
            .await?;
        Ok(update.map(|update| self.history_changed(update, "undo")))
    }

    pub async fn reset_game(&self, game_id: Uuid) -> Result<(), ScoreboardError> {
        let update = ResetGame::new(self.state.game_repo.clone())
            .execute(game_id)
            .await?;
        self.history_changed(update, "reset");
        Ok(())
    }

    // ========== Roster and settings ==========

    /// Apply a roster edit; `None` when an index is out of range
    pub async fn update_players(
        &self,
        game_id: Uuid,
        command: PlayerCommand,
    ) -> Result<Option<PlayerCommandOutcome>, ScoreboardError> {
        let kind = command.as_str();
        let update = ManagePlayers::new(self.state.game_repo.clone())
            .execute(game_id, command)
            .await?;

        Ok(update.map(|update| {
            self.publish(
                update,
                ScoreboardEventKind::PlayersChanged,
                serde_json::json!({ "command": kind }),
            )
        }))
    }

    pub async fn update_settings(
        &self,
        game_id: Uuid,
        game_end_type: GameEndType,
        ending_score: i32,
        number_of_rounds: u32,
    ) -> Result<EndSettings, ScoreboardError> {
        let update = UpdateSettings::new(self.state.game_repo.clone())
            .execute(UpdateSettingsInput {
                game_id,
                game_end_type,
                ending_score,
                number_of_rounds,
            })
            .await?;

        let settings = serde_json::json!({ "settings": update.outcome });
        Ok(self.publish(update, ScoreboardEventKind::SettingsChanged, settings))
    }

    // ========== Helpers ==========

    pub(super) async fn load(&self, game_id: Uuid) -> Result<Game, ScoreboardError> {
        self.state
            .game_repo
            .find_by_id(game_id)
            .await?
            .ok_or(ScoreboardError::GameNotFound)
    }

    fn history_changed<T>(&self, update: GameUpdate<T>, action: &str) -> T {
        self.publish(
            update,
            ScoreboardEventKind::HistoryChanged,
            serde_json::json!({ "action": action }),
        )
    }

    fn publish<T>(
        &self,
        update: GameUpdate<T>,
        kind: ScoreboardEventKind,
        data: serde_json::Value,
    ) -> T {
        self.state
            .broadcast_event(ScoreboardEvent::new(kind, Some(update.game.id)).with_data(data));
        self.reconcile_game_over(&update.game);
        update.outcome
    }

    /// Cancel any pending game over signal and schedule a new one when an
    /// active game is over
    pub(super) fn reconcile_game_over(&self, game: &Game) {
        self.state.game_over.cancel(game.id);

        if game.status == GameStatus::Active && game.is_end_of_game() {
            let winners = game.winning_players().iter().map(|p| p.id).collect();
            self.state
                .game_over
                .schedule(game.id, winners, self.state.event_sender.clone());
        }
    }
}
