use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "whats_the_score=debug";

/// Install the global tracing subscriber.
///
/// Returns `false` when a subscriber was already installed, so hosts and
/// tests may both call this.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
