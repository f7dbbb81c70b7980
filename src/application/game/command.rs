use uuid::Uuid;

use crate::domain::entities::Game;
use crate::domain::errors::GameError;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Result of a mutation applied to a stored game
#[derive(Debug, Clone)]
pub struct GameUpdate<T> {
    /// Game as saved after the mutation
    pub game: Game,
    pub outcome: T,
    pub is_end_of_game: bool,
}

/// Load a game, apply `mutate`, and save it when the mutation succeeds.
///
/// A rejected mutation leaves the stored game as it was.
pub(crate) async fn update_game<R, T, F>(
    repo: &R,
    game_id: Uuid,
    mutate: F,
) -> Result<GameUpdate<T>, GameCommandError>
where
    R: GameRepository + ?Sized,
    F: FnOnce(&mut Game) -> Result<T, GameError>,
{
    let updated = try_update_game(repo, game_id, |game| mutate(game).map(Some)).await?;
    // The closure above never reports a no-op
    updated.ok_or(GameCommandError::GameNotFound)
}

/// Like [`update_game`], for mutations that may turn out to be no-ops.
///
/// `Ok(None)` from `mutate` means nothing changed: the game is not saved and
/// its `updated_at` is left alone.
pub(crate) async fn try_update_game<R, T, F>(
    repo: &R,
    game_id: Uuid,
    mutate: F,
) -> Result<Option<GameUpdate<T>>, GameCommandError>
where
    R: GameRepository + ?Sized,
    F: FnOnce(&mut Game) -> Result<Option<T>, GameError>,
{
    let mut game = repo
        .find_by_id(game_id)
        .await?
        .ok_or(GameCommandError::GameNotFound)?;

    let outcome = mutate(&mut game).map_err(|e| {
        tracing::error!(game_id = %game_id, "Rejected game command: {}", e);
        e
    })?;

    let Some(outcome) = outcome else {
        tracing::debug!(game_id = %game_id, "Game command changed nothing");
        return Ok(None);
    };

    game.touch();
    repo.save(&game).await?;

    let is_end_of_game = game.is_end_of_game();
    Ok(Some(GameUpdate {
        game,
        outcome,
        is_end_of_game,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum GameCommandError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Game error: {0}")]
    Game(#[from] GameError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
