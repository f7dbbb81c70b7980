use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{PlayerIcon, PlayerSettings};

/// Player entity - a seat at the table
///
/// Scores are not stored here: they are derived from the game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    /// Turn order, dense from 0
    pub position: usize,
    pub icon: PlayerIcon,
}

impl Player {
    /// Create a new player
    pub fn new(name: impl Into<String>, position: usize, icon: PlayerIcon) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            icon,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            name: self.name.clone(),
            icon: self.icon,
        }
    }

    pub fn settings(&self) -> PlayerSettings {
        PlayerSettings::new(self.name.clone(), self.icon)
    }
}

/// What history rows need to render a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: Uuid,
    pub name: String,
    pub icon: PlayerIcon,
}

/// Ordered roster. Array order is turn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from setup settings, positioned in the given order
    pub fn from_settings(settings: &[PlayerSettings]) -> Self {
        let players = settings
            .iter()
            .enumerate()
            .map(|(position, s)| Player::new(s.name.clone(), position, s.icon))
            .collect();
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn as_slice(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn find(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.find(id).is_some()
    }

    pub fn icons(&self) -> Vec<PlayerIcon> {
        self.players.iter().map(|p| p.icon).collect()
    }

    /// Append a player at the end of the turn order
    pub fn add(&mut self, name: impl Into<String>, icon: PlayerIcon) -> &Player {
        let position = self.players.len();
        self.players.push(Player::new(name, position, icon));
        &self.players[position]
    }

    /// Move a player to a new slot. Out of range indices are ignored.
    pub fn move_player(&mut self, from: usize, to: usize) -> bool {
        if from >= self.players.len() || to >= self.players.len() {
            return false;
        }

        let player = self.players.remove(from);
        self.players.insert(to, player);
        self.renumber();
        true
    }

    /// Uniform random permutation of the turn order
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.players.shuffle(rng);
        self.renumber();
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.players.get_mut(index) {
            Some(player) => {
                player.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, index: usize, name: impl Into<String>, icon: PlayerIcon) -> bool {
        match self.players.get_mut(index) {
            Some(player) => {
                player.name = name.into();
                player.icon = icon;
                true
            }
            None => false,
        }
    }

    /// Remove the player at `index`, closing the gap in the turn order
    pub fn remove(&mut self, index: usize) -> Option<Player> {
        if index >= self.players.len() {
            return None;
        }

        let player = self.players.remove(index);
        self.renumber();
        Some(player)
    }

    fn renumber(&mut self) {
        for (position, player) in self.players.iter_mut().enumerate() {
            player.position = position;
        }
    }
}

impl<'a> IntoIterator for &'a PlayerRegistry {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}
