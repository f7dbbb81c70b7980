use serde::{Deserialize, Serialize};

/// Default number of rounds for a round-count game
pub const DEFAULT_NUMBER_OF_ROUNDS: u32 = 2;
/// Default winning score for a score-threshold game
pub const DEFAULT_ENDING_SCORE: i32 = 10;

/// How scores are entered during play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Free-form single player adjustments
    Basic,
    /// Scores entered for everyone at the end of each round
    Round,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Basic => "basic",
            GameType::Round => "round",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(GameType::Basic),
            "round" => Some(GameType::Round),
            _ => None,
        }
    }
}

/// Condition that ends a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEndType {
    None,
    RoundCount,
    ScoreThreshold,
}

impl GameEndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEndType::None => "none",
            GameEndType::RoundCount => "roundCount",
            GameEndType::ScoreThreshold => "scoreThreshold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(GameEndType::None),
            "roundCount" => Some(GameEndType::RoundCount),
            "scoreThreshold" => Some(GameEndType::ScoreThreshold),
            _ => None,
        }
    }
}

/// End condition settings, editable mid-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSettings {
    pub game_end_type: GameEndType,
    /// Score a player must reach for a score-threshold game
    pub ending_score: i32,
    /// Rounds to play for a round-count game
    pub number_of_rounds: u32,
}

impl Default for EndSettings {
    fn default() -> Self {
        Self {
            game_end_type: GameEndType::None,
            ending_score: DEFAULT_ENDING_SCORE,
            number_of_rounds: DEFAULT_NUMBER_OF_ROUNDS,
        }
    }
}

impl EndSettings {
    pub fn new(game_end_type: GameEndType) -> Self {
        Self {
            game_end_type,
            ..Default::default()
        }
    }

    /// Apply the single quantity collected at game setup.
    ///
    /// The quantity is the number of rounds for a round-count game and the
    /// winning score for a score-threshold game. Basic games have no end
    /// condition: the end type becomes `None` and the quantity is ignored.
    pub fn with_end_quantity(mut self, game_type: GameType, quantity: i32) -> Self {
        if game_type != GameType::Round {
            self.game_end_type = GameEndType::None;
            return self;
        }
        match self.game_end_type {
            GameEndType::None => {}
            GameEndType::RoundCount => self.number_of_rounds = quantity.max(0) as u32,
            GameEndType::ScoreThreshold => self.ending_score = quantity,
        }
        self
    }
}

/// Order in which the scoreboard lists players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortPreference {
    /// Highest score first, ties keep turn order
    #[default]
    Score,
    /// Turn order
    Position,
}
