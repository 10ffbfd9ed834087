// In crates/app-config/src/types.rs

use chrono::FixedOffset;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub use strategies::types::MACrossoverSettings;

use crate::error::{Error, Result};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Poll cycle timing and the symbol list source.
    #[serde(default)]
    pub poll: PollSettings,
    /// Moving average windows for the crossover classifier.
    #[serde(default)]
    pub strategy: MACrossoverSettings,
    /// Where and how signals are persisted.
    #[serde(default)]
    pub store: StoreSettings,
    /// Settings for the market data provider.
    #[serde(default)]
    pub provider: ProviderSettings,
    /// The zone every persisted timestamp is expressed in.
    #[serde(default)]
    pub timezone: TimezoneSettings,
}

impl Settings {
    /// Rejects values that deserialize fine but cannot drive the poll loop.
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_secs == 0 {
            return Err(Error::InvalidInterval);
        }
        self.timezone.offset()?;
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PollSettings {
    /// Seconds to sleep between the end of one cycle and the start of the next.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Provider lookback, e.g. "1d" or "5d".
    #[serde(default = "default_period")]
    pub period: String,
    /// Provider sampling interval, e.g. "15m".
    #[serde(default = "default_bar_interval")]
    pub interval: String,
    /// Plain text file with one ticker per line.
    #[serde(default = "default_symbols_file")]
    pub symbols_file: PathBuf,
    /// Ticker written into a freshly created symbols file.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
}

impl PollSettings {
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            period: default_period(),
            interval: default_bar_interval(),
            symbols_file: default_symbols_file(),
            default_symbol: default_symbol(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Csv,
    Sqlite,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            csv_path: default_csv_path(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// The chart endpoint; the symbol is appended as a path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct TimezoneSettings {
    /// Offset east of UTC, in minutes. 330 is IST.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl TimezoneSettings {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(Error::InvalidTimezone(self.utc_offset_minutes))
    }
}

impl Default for TimezoneSettings {
    fn default() -> Self {
        Self { utc_offset_minutes: default_utc_offset_minutes() }
    }
}

/// Helper functions for serde defaults
fn default_log_level() -> String { "info".to_string() }
fn default_interval_secs() -> u64 { 300 }
fn default_period() -> String { "1d".to_string() }
fn default_bar_interval() -> String { "15m".to_string() }
fn default_symbols_file() -> PathBuf { PathBuf::from("symbols.txt") }
fn default_symbol() -> String { "RELIANCE.NS".to_string() }
fn default_csv_path() -> PathBuf { PathBuf::from("signals.csv") }
fn default_sqlite_path() -> PathBuf { PathBuf::from("signals.db") }
fn default_base_url() -> String { "https://query1.finance.yahoo.com/v8/finance/chart".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_utc_offset_minutes() -> i32 { 330 }
