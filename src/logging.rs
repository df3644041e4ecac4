//! Tracing setup shared by the server and CLI binaries.

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter directive for the configured level
///
/// `RUST_LOG` wins over the config when set.
pub fn filter_directive(config: &LoggingConfig) -> String {
    std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("docqueue={},tower_http=info", config.level))
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::new(filter_directive(config));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "pretty" => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        other => {
            let result = registry.with(tracing_subscriber::fmt::layer()).try_init();
            tracing::warn!("Unknown log format '{}', using pretty", other);
            result
        }
    }
}
