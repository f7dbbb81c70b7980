use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_broadcast::Sender;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::infrastructure::app_state::{broadcast_event, ScoreboardEvent, ScoreboardEventKind};

struct PendingSignal {
    ticket: u64,
    handle: JoinHandle<()>,
}

/// Delayed game over signals, at most one pending per game.
///
/// Scheduling again for the same game aborts the earlier task, so only the
/// most recent request can fire.
pub struct GameOverScheduler {
    delay: Duration,
    pending: Arc<Mutex<HashMap<Uuid, PendingSignal>>>,
    next_ticket: AtomicU64,
}

impl GameOverScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn lock(
        pending: &Mutex<HashMap<Uuid, PendingSignal>>,
    ) -> MutexGuard<'_, HashMap<Uuid, PendingSignal>> {
        pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Broadcast a `gameOver` event for `game_id` after the configured delay
    pub fn schedule(
        &self,
        game_id: Uuid,
        winning_player_ids: Vec<Uuid>,
        sender: Sender<ScoreboardEvent>,
    ) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let delay = self.delay;
        let pending = Arc::clone(&self.pending);

        // Hold the lock across spawn so the task cannot look itself up too early
        let mut guard = Self::lock(&self.pending);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut pending = Self::lock(&pending);
                match pending.get(&game_id) {
                    Some(signal) if signal.ticket == ticket => {
                        pending.remove(&game_id);
                    }
                    _ => return,
                }
            }

            tracing::info!(game_id = %game_id, "Game over");
            let event = ScoreboardEvent::new(ScoreboardEventKind::GameOver, Some(game_id))
                .with_data(serde_json::json!({ "winningPlayerIds": winning_player_ids }));
            broadcast_event(&sender, event);
        });

        if let Some(previous) = guard.insert(game_id, PendingSignal { ticket, handle }) {
            previous.handle.abort();
            tracing::debug!(game_id = %game_id, "Replaced pending game over signal");
        } else {
            tracing::debug!(game_id = %game_id, delay_ms = delay.as_millis() as u64, "Scheduled game over signal");
        }
    }

    /// Drop the pending signal for `game_id`; returns whether one existed
    pub fn cancel(&self, game_id: Uuid) -> bool {
        match Self::lock(&self.pending).remove(&game_id) {
            Some(signal) => {
                signal.handle.abort();
                tracing::debug!(game_id = %game_id, "Cancelled game over signal");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, game_id: Uuid) -> bool {
        Self::lock(&self.pending).contains_key(&game_id)
    }
}

impl Drop for GameOverScheduler {
    fn drop(&mut self) {
        let mut pending = Self::lock(&self.pending);
        for (_, signal) in pending.drain() {
            signal.handle.abort();
        }
    }
}
