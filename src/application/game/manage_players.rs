use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Player, PurgeOutcome};
use crate::domain::repositories::GameRepository;
use crate::domain::value_objects::PlayerIcon;

use super::{try_update_game, GameCommandError, GameUpdate};

/// Roster edits, addressed by roster index
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Append a player with a random unused icon
    Add { name: Option<String> },
    Rename { index: usize, name: String },
    Update {
        index: usize,
        name: String,
        icon: PlayerIcon,
    },
    Move { from: usize, to: usize },
    Shuffle,
    /// Remove a player and everything they scored
    Remove { index: usize },
}

impl PlayerCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerCommand::Add { .. } => "add",
            PlayerCommand::Rename { .. } => "rename",
            PlayerCommand::Update { .. } => "update",
            PlayerCommand::Move { .. } => "move",
            PlayerCommand::Shuffle => "shuffle",
            PlayerCommand::Remove { .. } => "remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommandOutcome {
    Added(Player),
    Updated,
    Moved,
    Shuffled,
    Removed {
        player: Player,
        history: PurgeOutcome,
    },
}

/// Apply a roster edit to a stored game
pub struct ManagePlayers<R: GameRepository> {
    game_repo: Arc<R>,
}

impl<R: GameRepository> ManagePlayers<R> {
    pub fn new(game_repo: Arc<R>) -> Self {
        Self { game_repo }
    }

    /// `Ok(None)` when an index is out of range
    pub async fn execute(
        &self,
        game_id: Uuid,
        command: PlayerCommand,
    ) -> Result<Option<GameUpdate<PlayerCommandOutcome>>, GameCommandError> {
        let kind = command.as_str();
        let update = try_update_game(self.game_repo.as_ref(), game_id, |game| {
            let outcome = match command {
                PlayerCommand::Add { name } => {
                    Some(PlayerCommandOutcome::Added(game.add_player(name).clone()))
                }
                PlayerCommand::Rename { index, name } => game
                    .rename_player(index, name)
                    .then_some(PlayerCommandOutcome::Updated),
                PlayerCommand::Update { index, name, icon } => game
                    .update_player(index, name, icon)
                    .then_some(PlayerCommandOutcome::Updated),
                PlayerCommand::Move { from, to } => game
                    .move_player(from, to)
                    .then_some(PlayerCommandOutcome::Moved),
                PlayerCommand::Shuffle => {
                    game.shuffle_players();
                    Some(PlayerCommandOutcome::Shuffled)
                }
                PlayerCommand::Remove { index } => {
                    game.remove_player(index)
                        .map(|(player, history)| PlayerCommandOutcome::Removed { player, history })
                }
            };
            Ok(outcome)
        })
        .await?;

        match &update {
            Some(update) => tracing::debug!(
                game_id = %game_id,
                command = kind,
                players = update.game.players().len(),
                "Roster updated"
            ),
            None => tracing::debug!(game_id = %game_id, command = kind, "Roster command out of range"),
        }

        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Game;
    use crate::domain::value_objects::{EndSettings, GameType, PlayerSettings};
    use crate::infrastructure::database::repositories::InMemoryGameRepository;

    async fn setup() -> (Arc<InMemoryGameRepository>, Game) {
        let repo = Arc::new(InMemoryGameRepository::new());
        let mut game = Game::new("Hearts", GameType::Round, EndSettings::default()).with_players(&[
            PlayerSettings::new("A", PlayerIcon::Cat),
            PlayerSettings::new("B", PlayerIcon::Dog),
            PlayerSettings::new("C", PlayerIcon::Bear),
        ]);
        let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
        game.record_score_change(ids[1], 4).unwrap();
        game.record_end_round(&[(ids[0], 1), (ids[1], 2), (ids[2], 3)]).unwrap();
        repo.save(&game).await.unwrap();
        (repo, game)
    }

    #[tokio::test]
    async fn test_add_picks_unused_icon() {
        let (repo, game) = setup().await;
        let update = ManagePlayers::new(repo)
            .execute(game.id, PlayerCommand::Add { name: None })
            .await
            .unwrap()
            .unwrap();

        let PlayerCommandOutcome::Added(player) = update.outcome else {
            panic!("expected an added player");
        };
        assert_eq!(player.name, "");
        assert_eq!(player.position, 3);
        assert!(![PlayerIcon::Cat, PlayerIcon::Dog, PlayerIcon::Bear].contains(&player.icon));
    }

    #[tokio::test]
    async fn test_remove_purges_history() {
        let (repo, game) = setup().await;
        let b = game.players().as_slice()[1].id;

        let update = ManagePlayers::new(repo.clone())
            .execute(game.id, PlayerCommand::Remove { index: 1 })
            .await
            .unwrap()
            .unwrap();

        let PlayerCommandOutcome::Removed { player, history } = update.outcome else {
            panic!("expected a removed player");
        };
        assert_eq!(player.id, b);
        assert_eq!(history.segments_removed, 1);
        assert_eq!(history.round_lines_removed, 1);

        let stored = repo.find_by_id(game.id).await.unwrap().unwrap();
        assert_eq!(stored.players().len(), 2);
        assert_eq!(stored.history().len(), 1);
        assert_eq!(stored.current_round(), 2);
        assert_eq!(stored.check_invariants(), Ok(()));
    }

    #[tokio::test]
    async fn test_update_renames_history_entries() {
        let (repo, game) = setup().await;

        let update = ManagePlayers::new(repo)
            .execute(
                game.id,
                PlayerCommand::Update { index: 1, name: "Bee".into(), icon: PlayerIcon::Wizard },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(update.outcome, PlayerCommandOutcome::Updated);
        let names: Vec<String> = update
            .game
            .history_entries()
            .into_iter()
            .filter_map(|entry| match entry {
                crate::domain::entities::HistoryEntry::ScoreChange { player, .. } => Some(player.name),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Bee"]);
    }

    #[tokio::test]
    async fn test_out_of_range_commands_are_no_ops() {
        let (repo, game) = setup().await;
        let use_case = ManagePlayers::new(repo.clone());

        for command in [
            PlayerCommand::Remove { index: 3 },
            PlayerCommand::Rename { index: 3, name: "X".into() },
            PlayerCommand::Move { from: 0, to: 3 },
            PlayerCommand::Update { index: 9, name: "X".into(), icon: PlayerIcon::Robot },
        ] {
            assert!(use_case.execute(game.id, command).await.unwrap().is_none());
        }
        assert_eq!(repo.find_by_id(game.id).await.unwrap().unwrap(), game);
    }

    #[tokio::test]
    async fn test_move_keeps_positions_dense() {
        let (repo, game) = setup().await;
        let c = game.players().as_slice()[2].id;

        let update = ManagePlayers::new(repo)
            .execute(game.id, PlayerCommand::Move { from: 2, to: 0 })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(update.game.players().as_slice()[0].id, c);
        let positions: Vec<usize> = update.game.players().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_shuffle_is_a_permutation() {
        let (repo, game) = setup().await;

        let update = ManagePlayers::new(repo)
            .execute(game.id, PlayerCommand::Shuffle)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(update.outcome, PlayerCommandOutcome::Shuffled);
        let positions: Vec<usize> = update.game.players().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        let mut ids: Vec<Uuid> = update.game.players().iter().map(|p| p.id).collect();
        let mut original: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
        ids.sort();
        original.sort();
        assert_eq!(ids, original);
    }
}
