// In app/src/logging.rs

use tracing::Level;
use tracing_subscriber::filter::Targets;

/// Builds the log filter from the configured level name.
///
/// Unknown names fall back to INFO. sqlx statement logging is held at WARN
/// whatever the level.
pub fn targets(log_level: &str) -> Targets {
    let level = log_level.parse::<Level>().unwrap_or(Level::INFO);
    Targets::new()
        .with_target("sqlx::query", Level::WARN)
        .with_default(level)
}
