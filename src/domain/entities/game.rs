use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::GameError;
use crate::domain::value_objects::{
    random_unused_icon, EndSettings, GameEndType, GameType, PlayerIcon, PlayerSettings,
    SortPreference,
};

use super::{
    EndRound, HistoryEntry, HistoryLedger, HistorySegment, Player, PlayerRegistry, PurgeOutcome,
    ScoreChange,
};

/// Game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Completed,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Completed => "completed",
        }
    }
}

/// Game aggregate - roster, scoring history and end settings.
///
/// Every score is computed from the history, so the roster and the ledger
/// cannot drift apart. All mutations validate their references first and
/// either apply fully or leave the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub game_type: GameType,
    pub status: GameStatus,
    pub settings: EndSettings,
    current_round: u32,
    players: PlayerRegistry,
    history: HistoryLedger,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Game {
    /// Create a new game with an empty roster
    pub fn new(name: impl Into<String>, game_type: GameType, settings: EndSettings) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            game_type,
            status: GameStatus::Active,
            settings,
            current_round: 1,
            players: PlayerRegistry::new(),
            history: HistoryLedger::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_players(mut self, players: &[PlayerSettings]) -> Self {
        self.players = PlayerRegistry::from_settings(players);
        self
    }

    // ========== Read access ==========

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.find(id)
    }

    /// Sum of a player's deltas, widened so long games cannot overflow
    pub fn score_of(&self, player_id: Uuid) -> i64 {
        self.history
            .score_changes_for(player_id)
            .map(|sc| i64::from(sc.delta))
            .sum()
    }

    /// A player's score changes, oldest first
    pub fn score_changes_of(&self, player_id: Uuid) -> Vec<&ScoreChange> {
        self.history.score_changes_for(player_id).collect()
    }

    /// Players sharing the highest score. Ties produce several winners.
    pub fn winning_players(&self) -> Vec<&Player> {
        let scores: Vec<(&Player, i64)> = self
            .players
            .iter()
            .map(|p| (p, self.score_of(p.id)))
            .collect();

        let Some(best) = scores.iter().map(|(_, score)| *score).max() else {
            return Vec::new();
        };

        scores
            .into_iter()
            .filter(|(_, score)| *score == best)
            .map(|(p, _)| p)
            .collect()
    }

    pub fn is_end_of_game(&self) -> bool {
        match self.settings.game_end_type {
            GameEndType::None => false,
            GameEndType::RoundCount => self.current_round > self.settings.number_of_rounds,
            GameEndType::ScoreThreshold => self
                .players
                .iter()
                .any(|p| self.score_of(p.id) >= i64::from(self.settings.ending_score)),
        }
    }

    /// Players in display order. Score order is stable on ties.
    pub fn sorted_players(&self, preference: SortPreference) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        match preference {
            SortPreference::Score => {
                players.sort_by_cached_key(|p| std::cmp::Reverse(self.score_of(p.id)))
            }
            SortPreference::Position => players.sort_by_key(|p| p.position),
        }
        players
    }

    /// History with player names and icons resolved from the live roster
    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history
            .segments()
            .iter()
            .filter_map(|segment| match segment {
                HistorySegment::ScoreChange(sc) => {
                    self.players
                        .find(sc.player_id)
                        .map(|player| HistoryEntry::ScoreChange {
                            score_change: sc.clone(),
                            player: player.snapshot(),
                        })
                }
                HistorySegment::EndRound(er) => Some(HistoryEntry::EndRound {
                    end_round: er.clone(),
                    players: er
                        .player_ids()
                        .filter_map(|id| self.players.find(id))
                        .map(Player::snapshot)
                        .collect(),
                }),
            })
            .collect()
    }

    // ========== Roster ==========

    /// Add a player with a random icon nobody else is using
    pub fn add_player(&mut self, name: Option<String>) -> &Player {
        self.add_player_with(name, &mut rand::thread_rng())
    }

    pub fn add_player_with<R: Rng + ?Sized>(&mut self, name: Option<String>, rng: &mut R) -> &Player {
        let icon = random_unused_icon(&self.players.icons(), rng);
        self.players.add(name.unwrap_or_default(), icon)
    }

    pub fn move_player(&mut self, from: usize, to: usize) -> bool {
        self.players.move_player(from, to)
    }

    pub fn shuffle_players(&mut self) {
        self.shuffle_players_with(&mut rand::thread_rng());
    }

    pub fn shuffle_players_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.players.shuffle(rng);
    }

    /// Rename a player. History resolves names from the roster, so the new
    /// name shows up on every past score change at once.
    pub fn rename_player(&mut self, index: usize, name: impl Into<String>) -> bool {
        self.players.rename(index, name)
    }

    pub fn update_player(&mut self, index: usize, name: impl Into<String>, icon: PlayerIcon) -> bool {
        self.players.update(index, name, icon)
    }

    /// Remove a player and repair history.
    ///
    /// End rounds are not renumbered here: they all survive.
    pub fn remove_player(&mut self, index: usize) -> Option<(Player, PurgeOutcome)> {
        let player = self.players.remove(index)?;
        let outcome = self.history.purge_player(player.id);
        Some((player, outcome))
    }

    // ========== Scoring ==========

    /// Record a single player adjustment
    pub fn record_score_change(&mut self, player_id: Uuid, delta: i32) -> Result<ScoreChange, GameError> {
        if !self.players.contains(player_id) {
            return Err(GameError::PlayerNotFound(player_id));
        }

        let score_change = ScoreChange::new(player_id, delta);
        self.history
            .append(HistorySegment::ScoreChange(score_change.clone()));
        Ok(score_change)
    }

    /// Close the current round with one line per player in `batch`
    pub fn record_end_round(&mut self, batch: &[(Uuid, i32)]) -> Result<EndRound, GameError> {
        let mut seen = HashSet::with_capacity(batch.len());
        for (player_id, _) in batch {
            if !self.players.contains(*player_id) {
                return Err(GameError::PlayerNotFound(*player_id));
            }
            if !seen.insert(*player_id) {
                return Err(GameError::DuplicatePlayerInRound(*player_id));
            }
        }

        let lines = batch
            .iter()
            .map(|(player_id, delta)| ScoreChange::new(*player_id, *delta))
            .collect();
        let end_round = EndRound::new(self.current_round, lines);

        self.history
            .append(HistorySegment::EndRound(end_round.clone()));
        self.current_round += 1;
        Ok(end_round)
    }

    /// Overwrite a standalone score change in place
    pub fn edit_score_change(&mut self, updated: ScoreChange) -> Result<(), GameError> {
        if !self.players.contains(updated.player_id) {
            return Err(GameError::PlayerNotFound(updated.player_id));
        }

        let index = self
            .history
            .position_of_score_change(updated.id)
            .ok_or(GameError::ScoreChangeNotFound(updated.id))?;

        if let Some(HistorySegment::ScoreChange(existing)) = self.history.get(index) {
            if existing.player_id != updated.player_id {
                return Err(GameError::PlayerMismatch {
                    score_change_id: updated.id,
                    player_id: updated.player_id,
                });
            }
        }

        self.history
            .replace(index, HistorySegment::ScoreChange(updated));
        Ok(())
    }

    /// Replace an end round at its ledger position.
    ///
    /// Every line must already belong to the round under the same player.
    /// Lines left out of `updated` are dropped from the round. The round
    /// number is kept from the stored segment.
    pub fn edit_end_round(&mut self, updated: EndRound) -> Result<(), GameError> {
        let index = self
            .history
            .position_of_end_round(updated.id)
            .ok_or(GameError::EndRoundNotFound(updated.id))?;

        let round_number = match self.history.get(index) {
            Some(HistorySegment::EndRound(existing)) => {
                let mut seen = HashSet::with_capacity(updated.score_changes.len());
                for line in &updated.score_changes {
                    if !self.players.contains(line.player_id) {
                        return Err(GameError::PlayerNotFound(line.player_id));
                    }
                    let original = existing
                        .score_change(line.id)
                        .ok_or(GameError::ScoreChangeNotFound(line.id))?;
                    if original.player_id != line.player_id {
                        return Err(GameError::PlayerMismatch {
                            score_change_id: line.id,
                            player_id: line.player_id,
                        });
                    }
                    if !seen.insert(line.player_id) {
                        return Err(GameError::DuplicatePlayerInRound(line.player_id));
                    }
                }
                existing.round_number
            }
            _ => return Err(GameError::EndRoundNotFound(updated.id)),
        };

        self.history.replace(
            index,
            HistorySegment::EndRound(EndRound {
                round_number,
                ..updated
            }),
        );
        Ok(())
    }

    /// Delete a history segment. Out of range indices are ignored.
    ///
    /// Deleting an end round renumbers the remaining rounds from 1 and
    /// moves the current round back accordingly.
    pub fn delete_segment_at(&mut self, index: usize) -> Option<HistorySegment> {
        let removed = self.history.remove(index)?;

        if removed.is_end_round() {
            let remaining = self.history.renumber_end_rounds();
            self.current_round = remaining as u32 + 1;
        }

        Some(removed)
    }

    // ========== Settings and lifecycle ==========

    /// Change how the game ends. Existing history is not re-validated.
    pub fn update_settings(&mut self, game_end_type: GameEndType, ending_score: i32, number_of_rounds: u32) {
        self.settings = EndSettings {
            game_end_type,
            ending_score,
            number_of_rounds,
        };
    }

    /// Clear all scores. Roster and settings stay.
    pub fn reset(&mut self) {
        self.history.clear();
        self.current_round = 1;
    }

    pub fn complete(&mut self) {
        self.status = GameStatus::Completed;
    }

    pub fn reopen(&mut self) {
        self.status = GameStatus::Active;
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Fresh active game with the same name, settings and roster
    pub fn duplicate(&self) -> Game {
        let roster: Vec<PlayerSettings> = self.players.iter().map(Player::settings).collect();
        Game::new(self.name.clone(), self.game_type, self.settings).with_players(&roster)
    }

    /// Verify the structural invariants of a game, typically after decoding
    pub fn check_invariants(&self) -> Result<(), GameError> {
        for (index, player) in self.players.iter().enumerate() {
            if player.position != index {
                return Err(GameError::InvariantViolation(format!(
                    "player {} has position {} at index {}",
                    player.id, player.position, index
                )));
            }
        }

        let mut ids = HashSet::new();
        for segment in self.history.segments() {
            if let HistorySegment::EndRound(er) = segment {
                if !ids.insert(er.id) {
                    return Err(GameError::InvariantViolation(format!(
                        "duplicate end round id {}",
                        er.id
                    )));
                }
            }
            for sc in segment.score_changes() {
                if !self.players.contains(sc.player_id) {
                    return Err(GameError::InvariantViolation(format!(
                        "score change {} references missing player {}",
                        sc.id, sc.player_id
                    )));
                }
                if !ids.insert(sc.id) {
                    return Err(GameError::InvariantViolation(format!(
                        "duplicate score change id {}",
                        sc.id
                    )));
                }
            }
        }

        for (expected, er) in (1u32..).zip(self.history.end_rounds()) {
            if er.round_number != expected {
                return Err(GameError::InvariantViolation(format!(
                    "end round {} numbered {} but expected {}",
                    er.id, er.round_number, expected
                )));
            }
        }

        let expected_round = self.history.end_round_count() as u32 + 1;
        if self.current_round != expected_round {
            return Err(GameError::InvariantViolation(format!(
                "current round is {} but history implies {}",
                self.current_round, expected_round
            )));
        }

        Ok(())
    }
}
