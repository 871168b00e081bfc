//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `DINNER_LOG` environment variable ("error", "warn", "info",
//! "debug", "trace") and defaults to `warn`. Logs go to STDERR so stdout carries only the
//! plan output.

use tracing::Level;

pub const LOG_ENV_VAR: &str = "DINNER_LOG";

/// Install the global subscriber. Calling it again (e.g. from tests) is a no-op.
pub fn init_logging() {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|raw| parse_level_str(&raw))
        .unwrap_or(Level::WARN);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
