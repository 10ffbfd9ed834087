// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod symbols;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use symbols::load_symbols;
pub use types::{Settings, StoreBackend};

/// Loads the application settings from the `config` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from an optional `base.toml` file in `config_dir`.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
///
/// Every value has a built-in default, so a missing directory is not an error.
pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::from(config_dir.join("base")).required(false))
        .add_source(File::from(config_dir.join(&environment)).required(false))
        // Settings from environment variables (e.g., `APP_POLL__INTERVAL_SECS=30`).
        // The prefix is `APP`, separator is `__`.
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_apply_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path()).unwrap();

        assert_eq!(settings.poll.interval_secs, 300);
        assert_eq!(settings.poll.interval, "15m");
        assert_eq!(settings.strategy.short_window, 5);
        assert_eq!(settings.strategy.long_window, 20);
        assert_eq!(settings.store.backend, StoreBackend::Csv);
        assert_eq!(settings.timezone.offset().unwrap().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_base_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            r#"
            [poll]
            interval_secs = 30
            symbols_file = "watch.txt"

            [strategy]
            short_window = 3

            [store]
            backend = "sqlite"
            sqlite_path = "data/signals.db"
            "#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path()).unwrap();

        assert_eq!(settings.poll.interval_secs, 30);
        assert_eq!(settings.poll.symbols_file, Path::new("watch.txt"));
        assert_eq!(settings.poll.period, "1d");
        assert_eq!(settings.strategy.short_window, 3);
        assert_eq!(settings.strategy.long_window, 20);
        assert_eq!(settings.store.backend, StoreBackend::Sqlite);
        assert_eq!(settings.store.sqlite_path, Path::new("data/signals.db"));
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[poll]\ninterval_secs = 0\n").unwrap();

        assert!(matches!(load_settings_from(dir.path()), Err(Error::InvalidInterval)));
    }
}
