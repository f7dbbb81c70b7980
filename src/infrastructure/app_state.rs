use std::collections::HashMap;
use std::sync::Arc;

use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender, TrySendError};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::value_objects::SortPreference;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{self, repositories::SqliteGameRepository};
use crate::infrastructure::services::GameOverScheduler;

/// Buffered events per subscriber before the oldest are dropped
const EVENT_CAPACITY: usize = 1000;

/// Shared state behind the scoreboard api
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,

    /// Database connection pool
    pub db: SqlitePool,

    /// Game repository
    pub game_repo: Arc<SqliteGameRepository>,

    /// Change notifications for the presentation layer
    pub event_sender: Sender<ScoreboardEvent>,
    /// Keeps the channel open while nobody is subscribed
    pub event_receiver: InactiveReceiver<ScoreboardEvent>,

    /// Deferred game over signals, keyed by game id
    pub game_over: Arc<GameOverScheduler>,

    /// Scoreboard sort order per game
    pub sort_preferences: Arc<RwLock<HashMap<Uuid, SortPreference>>>,
}

impl AppState {
    /// Build state from the process environment
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(AppConfig::from_env()).await
    }

    pub async fn with_config(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        let db = database::connect(&config.database_url).await?;

        let game_repo = Arc::new(SqliteGameRepository::new(db.clone()));
        game_repo.init_schema().await?;

        // Old events are dropped for slow subscribers instead of blocking writers
        let (mut event_sender, event_receiver) = broadcast(EVENT_CAPACITY);
        event_sender.set_overflow(true);
        let event_receiver = event_receiver.deactivate();

        let game_over = Arc::new(GameOverScheduler::new(config.game_over_delay));

        Ok(Self {
            config,
            db,
            game_repo,
            event_sender,
            event_receiver,
            game_over,
            sort_preferences: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// New subscription to scoreboard events
    pub fn subscribe(&self) -> Receiver<ScoreboardEvent> {
        self.event_sender.new_receiver()
    }

    /// Broadcast an event to all subscribers
    pub fn broadcast_event(&self, event: ScoreboardEvent) {
        broadcast_event(&self.event_sender, event);
    }
}

/// Broadcast on a bare sender, for tasks that outlive the caller
pub fn broadcast_event(sender: &Sender<ScoreboardEvent>, event: ScoreboardEvent) {
    let receiver_count = sender.receiver_count();
    tracing::debug!(
        "Broadcasting event '{}' to {} receivers",
        event.kind.as_str(),
        receiver_count
    );
    match sender.try_broadcast(event) {
        Ok(None) => {}
        Ok(Some(_)) => {
            tracing::debug!("Event broadcast successfully with overflow");
        }
        Err(TrySendError::Inactive(_)) => {
            tracing::debug!("Event dropped, no active subscribers");
        }
        Err(e) => {
            tracing::warn!("Failed to broadcast event: {:?}", e);
        }
    }
}

/// Kinds of scoreboard notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreboardEventKind {
    GameCreated,
    GameDeleted,
    GameStatusChanged,
    PlayersChanged,
    HistoryChanged,
    SettingsChanged,
    SortPreferenceChanged,
    GameOver,
}

impl ScoreboardEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreboardEventKind::GameCreated => "gameCreated",
            ScoreboardEventKind::GameDeleted => "gameDeleted",
            ScoreboardEventKind::GameStatusChanged => "gameStatusChanged",
            ScoreboardEventKind::PlayersChanged => "playersChanged",
            ScoreboardEventKind::HistoryChanged => "historyChanged",
            ScoreboardEventKind::SettingsChanged => "settingsChanged",
            ScoreboardEventKind::SortPreferenceChanged => "sortPreferenceChanged",
            ScoreboardEventKind::GameOver => "gameOver",
        }
    }
}

/// Notification sent to the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardEvent {
    #[serde(rename = "type")]
    pub kind: ScoreboardEventKind,
    pub game_id: Option<Uuid>,
    /// Additional data fields (flattened into root)
    #[serde(flatten)]
    pub data: serde_json::Value,
    pub timestamp: i64,
}

impl ScoreboardEvent {
    pub fn new(kind: ScoreboardEventKind, game_id: Option<Uuid>) -> Self {
        Self {
            kind,
            game_id,
            data: serde_json::Value::Object(serde_json::Map::new()),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
