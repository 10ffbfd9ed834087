// In crates/database/src/record.rs

use chrono::{DateTime, FixedOffset};
use core_types::{Signal, SignalStatus, Symbol};

use crate::error::{Error, Result};

/// Column order shared by both backends.
pub const COLUMNS: [&str; 5] = ["symbol", "timestamp", "action", "price", "status"];

/// A signal flattened to its stored text form.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SignalRow {
    pub symbol: String,
    pub timestamp: String,
    pub action: String,
    pub price: f64,
    /// Absent in the legacy four-column layout.
    pub status: Option<String>,
}

impl From<&Signal> for SignalRow {
    fn from(signal: &Signal) -> Self {
        Self {
            symbol: signal.symbol.0.clone(),
            timestamp: signal.timestamp.to_rfc3339(),
            action: signal.action.to_string(),
            price: signal.price,
            status: Some(signal.status.to_string()),
        }
    }
}

impl SignalRow {
    /// Parses the row back into a `Signal`. `row` is only used for error context.
    pub fn into_signal(self, row: usize) -> Result<Signal> {
        let corrupt = |reason: String| Error::Corrupt { row, reason };

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => SignalStatus::Active,
            Some(s) => s.parse().map_err(|e| corrupt(format!("{e}")))?,
        };

        Ok(Signal {
            symbol: Symbol(self.symbol.trim().to_string()),
            timestamp: parse_timestamp(&self.timestamp).map_err(corrupt)?,
            action: self.action.parse().map_err(|e| corrupt(format!("{e}")))?,
            price: self.price,
            status,
        })
    }
}

/// Accepts RFC 3339 and the space-separated form older files were written in.
fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z"))
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}
