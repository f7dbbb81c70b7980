use uuid::Uuid;

/// Referential integrity errors raised by the game aggregate.
///
/// These mean the caller referenced something that is not part of the
/// current game state. They are rejected before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Player not found: {0}")]
    PlayerNotFound(Uuid),
    #[error("Score change not found: {0}")]
    ScoreChangeNotFound(Uuid),
    #[error("End round not found: {0}")]
    EndRoundNotFound(Uuid),
    #[error("Score change {score_change_id} does not belong to player {player_id}")]
    PlayerMismatch { score_change_id: Uuid, player_id: Uuid },
    #[error("Player {0} appears more than once in the same round")]
    DuplicatePlayerInRound(Uuid),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}
