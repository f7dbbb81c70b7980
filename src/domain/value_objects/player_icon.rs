use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Avatar shown next to a player's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerIcon {
    Alien,
    Astronaut,
    Bear,
    Cat,
    Dog,
    Dragon,
    Ghost,
    Knight,
    Ninja,
    Pirate,
    Robot,
    Wizard,
}

impl PlayerIcon {
    pub const ALL: [PlayerIcon; 12] = [
        PlayerIcon::Alien,
        PlayerIcon::Astronaut,
        PlayerIcon::Bear,
        PlayerIcon::Cat,
        PlayerIcon::Dog,
        PlayerIcon::Dragon,
        PlayerIcon::Ghost,
        PlayerIcon::Knight,
        PlayerIcon::Ninja,
        PlayerIcon::Pirate,
        PlayerIcon::Robot,
        PlayerIcon::Wizard,
    ];
}

impl Default for PlayerIcon {
    fn default() -> Self {
        PlayerIcon::Alien
    }
}

/// Pick a random icon nobody in `taken` is using.
///
/// Falls back to any icon once every icon is in use.
pub fn random_unused_icon<R: Rng + ?Sized>(taken: &[PlayerIcon], rng: &mut R) -> PlayerIcon {
    let free: Vec<PlayerIcon> = PlayerIcon::ALL
        .iter()
        .copied()
        .filter(|icon| !taken.contains(icon))
        .collect();

    free.choose(rng)
        .or_else(|| PlayerIcon::ALL.choose(rng))
        .copied()
        .unwrap_or_default()
}

/// Name and icon collected for a player before the game starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSettings {
    pub name: String,
    pub icon: PlayerIcon,
}

impl PlayerSettings {
    pub fn new(name: impl Into<String>, icon: PlayerIcon) -> Self {
        Self {
            name: name.into(),
            icon,
        }
    }
}
