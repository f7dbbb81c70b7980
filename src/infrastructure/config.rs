use std::time::Duration;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/whats_the_score.db";
/// Default wait before the game over signal is shown
pub const DEFAULT_GAME_OVER_DELAY_MS: u64 = 500;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    /// Wait between the end of game and the game over signal
    pub game_over_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            game_over_delay: Duration::from_millis(DEFAULT_GAME_OVER_DELAY_MS),
        }
    }
}

impl AppConfig {
    /// In-memory database, for tests and previews
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable source
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = var("DATABASE_URL")
            .or_else(|| var("DB_PATH"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        // Ensure path has sqlite: prefix
        let database_url = if db_path.starts_with("sqlite:") {
            db_path
        } else {
            format!("sqlite:{}", db_path)
        };

        let game_over_delay = match var("GAME_OVER_DELAY_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!(
                        "Invalid GAME_OVER_DELAY_MS '{}' ({}), using {}ms",
                        raw,
                        e,
                        DEFAULT_GAME_OVER_DELAY_MS
                    );
                    Duration::from_millis(DEFAULT_GAME_OVER_DELAY_MS)
                }
            },
            None => Duration::from_millis(DEFAULT_GAME_OVER_DELAY_MS),
        };

        Self {
            database_url,
            game_over_delay,
        }
    }
}
