use std::sync::Arc;

use rand::Rng;

use crate::domain::entities::Game;
use crate::domain::repositories::GameRepository;
use crate::domain::value_objects::{
    random_unused_icon, EndSettings, GameEndType, GameType, PlayerSettings,
};

use super::GameLibraryError;

pub const QUICK_GAME_NAME: &str = "Quick Game";

/// Create game input
pub struct CreateGameInput {
    pub name: String,
    pub game_type: GameType,
    pub game_end_type: GameEndType,
    /// Rounds to play or score to reach, depending on the end type
    pub end_quantity: i32,
    /// Roster in turn order
    pub players: Vec<PlayerSettings>,
}

/// Create game use case
pub struct CreateGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> CreateGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: CreateGameInput) -> Result<Game, GameLibraryError> {
        let settings = EndSettings::new(input.game_end_type)
            .with_end_quantity(input.game_type, input.end_quantity);

        let game = Game::new(input.name, input.game_type, settings).with_players(&input.players);
        self.game_repo.save(&game).await?;

        tracing::info!(
            game_id = %game.id,
            game_type = game.game_type.as_str(),
            end_type = game.settings.game_end_type.as_str(),
            players = game.players().len(),
            "Created game '{}'",
            game.name
        );

        Ok(game)
    }
}

/// Start a two player basic game with no setup
pub struct StartQuickGame<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> StartQuickGame<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self) -> Result<Game, GameLibraryError> {
        let game = quick_game(&mut rand::thread_rng());
        self.game_repo.save(&game).await?;

        tracing::info!(game_id = %game.id, "Started quick game");
        Ok(game)
    }
}

/// "Player 1" and "Player 2" with two different random icons
pub fn quick_game<G: Rng + ?Sized>(rng: &mut G) -> Game {
    let first = random_unused_icon(&[], rng);
    let second = random_unused_icon(&[first], rng);

    Game::new(QUICK_GAME_NAME, GameType::Basic, EndSettings::default()).with_players(&[
        PlayerSettings::new("Player 1", first),
        PlayerSettings::new("Player 2", second),
    ])
}
