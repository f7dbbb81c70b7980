//! Scoreboard integration tests
//!
//! Drives the in-process api against an in-memory SQLite database and checks
//! stored state, derived read models and broadcast events together.

use std::sync::Arc;
use std::time::Duration;

use async_broadcast::Receiver;
use uuid::Uuid;

use whats_the_score::api::{
    ScoreboardApi, ScoreboardError, ScoreboardEvent, ScoreboardEventKind,
};
use whats_the_score::application::game::{PlayerCommand, PlayerCommandOutcome, RoundScore};
use whats_the_score::application::library::{CreateGameInput, QUICK_GAME_NAME};
use whats_the_score::domain::entities::{GameStatus, HistoryEntry, HistorySegment};
use whats_the_score::domain::errors::GameError;
use whats_the_score::domain::services::ScoreboardProgress;
use whats_the_score::domain::value_objects::{
    GameEndType, GameType, PlayerIcon, PlayerSettings, SortPreference,
};
use whats_the_score::infrastructure::app_state::AppState;
use whats_the_score::infrastructure::config::AppConfig;
use whats_the_score::infrastructure::telemetry::init_tracing;

const GAME_OVER_DELAY: Duration = Duration::from_millis(50);

/// Helper to create an api over a fresh in-memory database
async fn create_test_api() -> ScoreboardApi {
    create_api_with(AppConfig {
        game_over_delay: GAME_OVER_DELAY,
        ..AppConfig::in_memory()
    })
    .await
}

async fn create_api_with(config: AppConfig) -> ScoreboardApi {
    init_tracing();
    let state = AppState::with_config(config)
        .await
        .expect("Failed to create app state");
    ScoreboardApi::new(Arc::new(state))
}

fn roster(names: &[&str]) -> Vec<PlayerSettings> {
    names
        .iter()
        .zip(PlayerIcon::ALL)
        .map(|(name, icon)| PlayerSettings::new(*name, icon))
        .collect()
}

fn round_game(names: &[&str], end: GameEndType, quantity: i32) -> CreateGameInput {
    CreateGameInput {
        name: "Family Night".into(),
        game_type: GameType::Round,
        game_end_type: end,
        end_quantity: quantity,
        players: roster(names),
    }
}

fn round(ids: &[Uuid], deltas: &[i32]) -> Vec<RoundScore> {
    ids.iter()
        .zip(deltas)
        .map(|(player_id, delta)| RoundScore {
            player_id: *player_id,
            delta: *delta,
        })
        .collect()
}

/// Drain every event that is already buffered
fn drain(receiver: &mut Receiver<ScoreboardEvent>) -> Vec<ScoreboardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

fn game_over_events(events: &[ScoreboardEvent]) -> Vec<&ScoreboardEvent> {
    events
        .iter()
        .filter(|e| e.kind == ScoreboardEventKind::GameOver)
        .collect()
}

async fn wait_past_game_over_delay() {
    tokio::time::sleep(GAME_OVER_DELAY * 6).await;
}

// ============================================================================
// Scoring scenarios
// ============================================================================

#[tokio::test]
async fn test_round_robin_game_ends_after_third_round() {
    let api = create_test_api().await;
    let mut events = api.subscribe();
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 3))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();

    api.record_end_round(game.id, round(&ids, &[10, 4])).await.unwrap();
    api.record_end_round(game.id, round(&ids, &[2, 9])).await.unwrap();

    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(view.current_round, 3);
    assert!(!view.is_end_of_game);
    assert_eq!(view.progress, ScoreboardProgress::LastRound);

    let last = api.record_end_round(game.id, round(&ids, &[1, 1])).await.unwrap();
    assert_eq!(last.round_number, 3);

    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(view.current_round, 4);
    assert!(view.is_end_of_game);
    assert_eq!(view.progress, ScoreboardProgress::GameOver);
    assert_eq!(view.winning_player_ids, vec![ids[1]]);

    wait_past_game_over_delay().await;
    let events = drain(&mut events);
    let over = game_over_events(&events);
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].game_id, Some(game.id));
    assert_eq!(over[0].data["winningPlayerIds"][0], ids[1].to_string());
    assert!(events
        .iter()
        .any(|e| e.kind == ScoreboardEventKind::HistoryChanged));
}

#[tokio::test]
async fn test_score_threshold_scenario() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::ScoreThreshold, 10))
        .await
        .unwrap();
    let a = game.players().as_slice()[0].id;
    let b = game.players().as_slice()[1].id;

    api.record_score_change(game.id, a, 7).await.unwrap();
    api.record_score_change(game.id, b, 3).await.unwrap();

    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(
        view.progress,
        ScoreboardProgress::PointsToWin {
            leaders: vec![a],
            points: 3
        }
    );

    api.record_score_change(game.id, a, 5).await.unwrap();
    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(view.players[0].score, 12);
    assert!(view.is_end_of_game);
    assert_eq!(view.winning_player_ids, vec![a]);
}

#[tokio::test]
async fn test_delete_repair_scenario() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::None, 0))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();

    api.record_end_round(game.id, round(&ids, &[1, 2])).await.unwrap();
    api.record_end_round(game.id, round(&ids, &[20, 40])).await.unwrap();
    api.record_end_round(game.id, round(&ids, &[3, 4])).await.unwrap();

    let removed = api.delete_history_segment(game.id, 1).await.unwrap();
    assert!(matches!(removed, Some(HistorySegment::EndRound(er)) if er.round_number == 2));

    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(view.current_round, 3);
    let scores: Vec<(Uuid, i64)> = view.players.iter().map(|p| (p.id, p.score)).collect();
    assert!(scores.contains(&(ids[0], 4)));
    assert!(scores.contains(&(ids[1], 6)));

    let numbers: Vec<u32> = api
        .history(game.id)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|entry| match entry {
            HistoryEntry::EndRound { end_round, .. } => Some(end_round.round_number),
            _ => None,
        })
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    assert!(api.delete_history_segment(game.id, 5).await.unwrap().is_none());
}

#[tokio::test]
async fn test_player_removal_scenario() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob", "Cy"], GameEndType::None, 0))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();

    api.record_score_change(game.id, ids[1], 5).await.unwrap();
    api.record_end_round(game.id, round(&ids, &[1, 2, 3])).await.unwrap();
    api.record_score_change(game.id, ids[0], 8).await.unwrap();

    let outcome = api
        .update_players(game.id, PlayerCommand::Remove { index: 1 })
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        Some(PlayerCommandOutcome::Removed { ref player, .. }) if player.id == ids[1]
    ));

    let history = api.history(game.id).await.unwrap();
    assert_eq!(history.len(), 2);
    match &history[0] {
        HistoryEntry::EndRound { end_round, players } => {
            assert_eq!(end_round.round_number, 1);
            assert_eq!(end_round.score_changes.len(), 2);
            assert!(players.iter().all(|p| p.id != ids[1]));
        }
        other => panic!("unexpected entry {:?}", other),
    }

    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(view.current_round, 2);
    let positions: Vec<usize> = {
        let mut p: Vec<usize> = view.players.iter().map(|p| p.position).collect();
        p.sort();
        p
    };
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn test_rename_shows_in_history() {
    let api = create_test_api().await;
    let game = api.start_quick_game().await.unwrap();
    let first = game.players().as_slice()[0].id;

    api.record_score_change(game.id, first, 1).await.unwrap();
    api.update_players(
        game.id,
        PlayerCommand::Update {
            index: 0,
            name: "Grandma".into(),
            icon: PlayerIcon::Wizard,
        },
    )
    .await
    .unwrap();

    let history = api.history(game.id).await.unwrap();
    assert!(matches!(
        &history[0],
        HistoryEntry::ScoreChange { player, .. } if player.name == "Grandma" && player.icon == PlayerIcon::Wizard
    ));
}

#[tokio::test]
async fn test_invalid_operation_leaves_game_untouched() {
    let api = create_test_api().await;
    let game = api.start_quick_game().await.unwrap();
    let stranger = Uuid::new_v4();

    let result = api.record_score_change(game.id, stranger, 3).await;
    assert!(matches!(
        result,
        Err(ScoreboardError::InvalidOperation(GameError::PlayerNotFound(id))) if id == stranger
    ));
    assert!(api.history(game.id).await.unwrap().is_empty());

    let missing = api.scoreboard(Uuid::new_v4()).await;
    assert!(matches!(missing, Err(ScoreboardError::GameNotFound)));
}

#[tokio::test]
async fn test_failed_save_reports_persistence_error_without_side_effects() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 1))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
    let mut events = api.subscribe();

    // Reads keep working, every write to an existing game is refused
    sqlx::query(
        "CREATE TRIGGER reject_game_updates BEFORE UPDATE ON games
         BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .execute(&api.state().db)
    .await
    .unwrap();

    let result = api.record_end_round(game.id, round(&ids, &[5, 3])).await;
    match result {
        Err(ScoreboardError::Persistence { message }) => assert!(message.contains("disk full")),
        other => panic!("expected a persistence failure, got {other:?}"),
    }
    assert!(!api.state().game_over.is_pending(game.id));

    wait_past_game_over_delay().await;
    assert!(drain(&mut events).is_empty());

    let view = api.scoreboard(game.id).await.unwrap();
    assert_eq!(view.current_round, 1);
    assert!(!view.is_end_of_game);
    assert!(api.history(game.id).await.unwrap().is_empty());

    // Once writes succeed again the same round ends the game as usual
    sqlx::query("DROP TRIGGER reject_game_updates")
        .execute(&api.state().db)
        .await
        .unwrap();
    api.record_end_round(game.id, round(&ids, &[5, 3])).await.unwrap();
    wait_past_game_over_delay().await;
    let events = drain(&mut events);
    assert_eq!(events[0].kind, ScoreboardEventKind::HistoryChanged);
    assert_eq!(game_over_events(&events).len(), 1);
}

#[tokio::test]
async fn test_clones_writing_in_turn_keep_every_change() {
    let api = create_test_api().await;
    let other = api.clone();
    let game = api.start_quick_game().await.unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();

    api.record_score_change(game.id, ids[0], 4).await.unwrap();
    other.record_score_change(game.id, ids[1], 7).await.unwrap();
    api.record_score_change(game.id, ids[0], 2).await.unwrap();

    let view = other.scoreboard(game.id).await.unwrap();
    let scores: Vec<(Uuid, i64)> = view.players.iter().map(|p| (p.id, p.score)).collect();
    assert_eq!(scores, vec![(ids[1], 7), (ids[0], 6)]);
    assert_eq!(api.history(game.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_undo_basic_and_round_games() {
    let api = create_test_api().await;
    let basic = api.start_quick_game().await.unwrap();
    let [p1, p2] = [basic.players().as_slice()[0].id, basic.players().as_slice()[1].id];

    api.record_score_change(basic.id, p1, 4).await.unwrap();
    api.record_score_change(basic.id, p2, 6).await.unwrap();

    let undone = api.undo(basic.id).await.unwrap();
    assert!(matches!(undone, Some(HistorySegment::ScoreChange(sc)) if sc.player_id == p2));
    let view = api.scoreboard(basic.id).await.unwrap();
    assert!(view.can_undo);
    assert!(matches!(view.last_action, Some(HistorySegment::ScoreChange(ref sc)) if sc.player_id == p1));

    api.undo(basic.id).await.unwrap();
    assert!(api.undo(basic.id).await.unwrap().is_none());
    assert!(!api.scoreboard(basic.id).await.unwrap().can_undo);

    let rounds = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 2))
        .await
        .unwrap();
    let ids: Vec<Uuid> = rounds.players().iter().map(|p| p.id).collect();
    api.record_end_round(rounds.id, round(&ids, &[1, 2])).await.unwrap();
    api.record_score_change(rounds.id, ids[0], 10).await.unwrap();

    assert!(matches!(
        api.undo(rounds.id).await.unwrap(),
        Some(HistorySegment::EndRound(_))
    ));
    let view = api.scoreboard(rounds.id).await.unwrap();
    assert_eq!(view.current_round, 1);
    assert!(!view.can_undo);
}

// ============================================================================
// Deferred game over
// ============================================================================

#[tokio::test]
async fn test_game_over_fires_once_for_latest_state() {
    let api = create_test_api().await;
    let mut events = api.subscribe();
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::ScoreThreshold, 10))
        .await
        .unwrap();
    let a = game.players().as_slice()[0].id;
    let b = game.players().as_slice()[1].id;

    api.record_score_change(game.id, a, 10).await.unwrap();
    api.record_score_change(game.id, b, 15).await.unwrap();

    wait_past_game_over_delay().await;
    let events = drain(&mut events);
    let over = game_over_events(&events);
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].data["winningPlayerIds"][0], b.to_string());
}

#[tokio::test]
async fn test_undo_before_delay_cancels_game_over() {
    let api = create_test_api().await;
    let mut events = api.subscribe();
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 1))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();

    api.record_end_round(game.id, round(&ids, &[1, 2])).await.unwrap();
    assert!(api.state().game_over.is_pending(game.id));
    api.undo(game.id).await.unwrap();
    assert!(!api.state().game_over.is_pending(game.id));

    wait_past_game_over_delay().await;
    assert!(game_over_events(&drain(&mut events)).is_empty());
}

#[tokio::test]
async fn test_open_finished_game_surfaces_game_over() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 1))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
    api.record_end_round(game.id, round(&ids, &[5, 2])).await.unwrap();
    wait_past_game_over_delay().await;

    let mut events = api.subscribe();
    let view = api.open_game(game.id).await.unwrap();
    assert!(view.is_end_of_game);

    wait_past_game_over_delay().await;
    let events = drain(&mut events);
    assert_eq!(game_over_events(&events).len(), 1);
}

#[tokio::test]
async fn test_completed_game_does_not_signal() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 1))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
    let mut events = api.subscribe();

    api.record_end_round(game.id, round(&ids, &[5, 2])).await.unwrap();
    let ended = api.end_game(game.id).await.unwrap();
    assert_eq!(ended.status, GameStatus::Completed);

    wait_past_game_over_delay().await;
    let events = drain(&mut events);
    assert!(game_over_events(&events).is_empty());
    assert!(events
        .iter()
        .any(|e| e.kind == ScoreboardEventKind::GameStatusChanged));
}

// ============================================================================
// Library
// ============================================================================

#[tokio::test]
async fn test_quick_game_and_play_again() {
    let api = create_test_api().await;
    let quick = api.start_quick_game().await.unwrap();
    assert_eq!(quick.name, QUICK_GAME_NAME);
    assert_eq!(quick.game_type, GameType::Basic);
    let players = quick.players().as_slice();
    assert_ne!(players[0].icon, players[1].icon);

    api.record_score_change(quick.id, players[0].id, 3).await.unwrap();
    api.set_sort_preference(quick.id, SortPreference::Position)
        .await
        .unwrap();
    api.end_game(quick.id).await.unwrap();
    assert!(api.active_game().await.unwrap().is_none());

    let again = api.play_again(quick.id).await.unwrap();
    assert_ne!(again.id, quick.id);
    assert!(again.history().is_empty());
    assert_eq!(again.players().len(), 2);
    assert_eq!(api.sort_preference(again.id).await, SortPreference::Position);
    assert_eq!(api.active_game().await.unwrap().map(|g| g.id), Some(again.id));

    let all = api.list_games().await.unwrap();
    assert_eq!(all.len(), 2);

    api.delete_game(quick.id).await.unwrap();
    assert_eq!(api.list_games().await.unwrap().len(), 1);
    assert!(matches!(
        api.delete_game(quick.id).await,
        Err(ScoreboardError::GameNotFound)
    ));
}

#[tokio::test]
async fn test_sort_preference_orders_standings() {
    let api = create_test_api().await;
    let game = api
        .create_game(round_game(&["Ann", "Bob", "Cy"], GameEndType::None, 0))
        .await
        .unwrap();
    let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
    api.record_end_round(game.id, round(&ids, &[1, 9, 9])).await.unwrap();

    let by_score = api.scoreboard(game.id).await.unwrap();
    assert_eq!(by_score.sort_preference, SortPreference::Score);
    let names: Vec<&str> = by_score.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Cy", "Ann"]);

    let by_position = api
        .set_sort_preference(game.id, SortPreference::Position)
        .await
        .unwrap();
    let names: Vec<&str> = by_position.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob", "Cy"]);
}

#[tokio::test]
async fn test_games_survive_restart() {
    let path = std::env::temp_dir().join(format!("whats_the_score_{}.db", Uuid::new_v4()));
    let config = AppConfig {
        database_url: format!("sqlite:{}", path.display()),
        game_over_delay: GAME_OVER_DELAY,
    };

    let game_id = {
        let api = create_api_with(config.clone()).await;
        let game = api
            .create_game(round_game(&["Ann", "Bob"], GameEndType::RoundCount, 3))
            .await
            .unwrap();
        let ids: Vec<Uuid> = game.players().iter().map(|p| p.id).collect();
        api.record_end_round(game.id, round(&ids, &[4, 6])).await.unwrap();
        api.update_settings(game.id, GameEndType::RoundCount, 10, 5)
            .await
            .unwrap();
        api.state().db.close().await;
        game.id
    };

    let api = create_api_with(config).await;
    let view = api.open_game(game_id).await.unwrap();
    assert_eq!(view.current_round, 2);
    assert_eq!(view.settings.number_of_rounds, 5);
    assert_eq!(view.progress, ScoreboardProgress::RoundsLeft { rounds: 4 });
    assert_eq!(api.active_game().await.unwrap().map(|g| g.id), Some(game_id));

    api.state().db.close().await;
    std::fs::remove_file(&path).ok();
}
