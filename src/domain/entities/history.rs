use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EndRound, PlayerSnapshot, ScoreChange};

/// One entry of the scoring history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum HistorySegment {
    ScoreChange(ScoreChange),
    EndRound(EndRound),
}

impl HistorySegment {
    pub fn id(&self) -> Uuid {
        match self {
            HistorySegment::ScoreChange(sc) => sc.id,
            HistorySegment::EndRound(er) => er.id,
        }
    }

    pub fn is_end_round(&self) -> bool {
        matches!(self, HistorySegment::EndRound(_))
    }

    pub fn is_score_change(&self) -> bool {
        matches!(self, HistorySegment::ScoreChange(_))
    }

    /// Every score change carried by this segment
    pub fn score_changes(&self) -> &[ScoreChange] {
        match self {
            HistorySegment::ScoreChange(sc) => std::slice::from_ref(sc),
            HistorySegment::EndRound(er) => &er.score_changes,
        }
    }
}

/// History segment with its players resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryEntry {
    ScoreChange {
        #[serde(rename = "scoreChange")]
        score_change: ScoreChange,
        player: PlayerSnapshot,
    },
    EndRound {
        #[serde(rename = "endRound")]
        end_round: EndRound,
        players: Vec<PlayerSnapshot>,
    },
}

/// Result of purging a removed player from history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    /// Standalone score change segments deleted
    pub segments_removed: usize,
    /// Lines removed from end round segments that survive
    pub round_lines_removed: usize,
}

/// Ordered scoring history, the system of record for every score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    segments: Vec<HistorySegment>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[HistorySegment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&HistorySegment> {
        self.segments.get(index)
    }

    pub fn append(&mut self, segment: HistorySegment) {
        self.segments.push(segment);
    }

    /// Replace the segment at `index` in place. Returns the old segment.
    pub fn replace(&mut self, index: usize, segment: HistorySegment) -> Option<HistorySegment> {
        let slot = self.segments.get_mut(index)?;
        Some(std::mem::replace(slot, segment))
    }

    pub fn remove(&mut self, index: usize) -> Option<HistorySegment> {
        if index >= self.segments.len() {
            return None;
        }
        Some(self.segments.remove(index))
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Index of the standalone score change segment with this id
    pub fn position_of_score_change(&self, id: Uuid) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| matches!(s, HistorySegment::ScoreChange(sc) if sc.id == id))
    }

    pub fn position_of_end_round(&self, id: Uuid) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| matches!(s, HistorySegment::EndRound(er) if er.id == id))
    }

    pub fn end_round_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_end_round()).count()
    }

    pub fn end_rounds(&self) -> impl Iterator<Item = &EndRound> {
        self.segments.iter().filter_map(|s| match s {
            HistorySegment::EndRound(er) => Some(er),
            HistorySegment::ScoreChange(_) => None,
        })
    }

    /// Every score change in ledger order, across both segment kinds
    pub fn all_score_changes(&self) -> impl Iterator<Item = &ScoreChange> {
        self.segments.iter().flat_map(|s| s.score_changes())
    }

    /// A player's score changes in ledger order
    pub fn score_changes_for(&self, player_id: Uuid) -> impl Iterator<Item = &ScoreChange> {
        self.all_score_changes()
            .filter(move |sc| sc.player_id == player_id)
    }

    /// Index of the newest segment matching `predicate`
    pub fn last_position_where<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&HistorySegment) -> bool,
    {
        self.segments.iter().rposition(predicate)
    }

    /// Renumber end rounds densely from 1 in ledger order.
    ///
    /// Returns how many end rounds remain.
    pub fn renumber_end_rounds(&mut self) -> usize {
        let mut count = 0;
        for segment in self.segments.iter_mut() {
            if let HistorySegment::EndRound(er) = segment {
                count += 1;
                er.round_number = count as u32;
            }
        }
        count
    }

    /// Repair history after a player leaves the game.
    ///
    /// Standalone score changes for the player are deleted. End rounds keep
    /// their place and number and only lose the player's line.
    pub fn purge_player(&mut self, player_id: Uuid) -> PurgeOutcome {
        let mut outcome = PurgeOutcome::default();

        self.segments.retain_mut(|segment| match segment {
            HistorySegment::ScoreChange(sc) => {
                if sc.player_id == player_id {
                    outcome.segments_removed += 1;
                    false
                } else {
                    true
                }
            }
            HistorySegment::EndRound(er) => {
                if er.remove_player(player_id) {
                    outcome.round_lines_removed += 1;
                }
                true
            }
        });

        outcome
    }
}
