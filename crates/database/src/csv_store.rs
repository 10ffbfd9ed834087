// In crates/database/src/csv_store.rs

use async_trait::async_trait;
use core_types::Signal;
use csv::{Reader, Writer};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Cause, Error, Result};
use crate::record::{COLUMNS, SignalRow};
use crate::{SignalReader, SignalWriter};

const BACKEND: &str = "csv";

/// Persists signals as a CSV file with a fixed header row.
#[derive(Debug, Clone)]
pub struct CsvSignalStore {
    path: PathBuf,
}

impl CsvSignalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sibling file the new contents are written to before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_file(path: &Path, signals: &[Signal]) -> std::result::Result<(), Cause> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(COLUMNS)?;

        for signal in signals {
            let row = SignalRow::from(signal);
            writer.write_record([
                row.symbol,
                row.timestamp,
                row.action,
                row.price.to_string(),
                row.status.unwrap_or_default(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    fn replace(&self, signals: &[Signal]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::write(BACKEND, e))?;
        }

        let staging = self.staging_path();
        if let Err(cause) = Self::write_file(&staging, signals) {
            let _ = fs::remove_file(&staging);
            return Err(Error::WriteFailed { backend: BACKEND, cause });
        }
        fs::rename(&staging, &self.path).map_err(|e| Error::write(BACKEND, e))?;

        tracing::debug!(path = %self.path.display(), count = signals.len(), "Signals written to CSV.");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Signal>> {
        let mut reader = match Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                if let csv::ErrorKind::Io(io) = e.kind() {
                    if io.kind() == ErrorKind::NotFound {
                        return Ok(Vec::new());
                    }
                }
                return Err(Error::read(BACKEND, e));
            }
        };

        let headers = reader.headers().map_err(|e| Error::read(BACKEND, e))?.clone();
        if headers.is_empty() {
            tracing::warn!(path = %self.path.display(), "Signal file has no header row. Treating it as empty.");
            return Ok(Vec::new());
        }

        let column = |names: &[&str]| headers.iter().position(|h| names.contains(&h.trim()));
        let missing = |name: &str| Error::Corrupt { row: 0, reason: format!("missing `{name}` column") };

        let symbol_col = column(&["symbol"]).ok_or_else(|| missing("symbol"))?;
        let timestamp_col = column(&["timestamp", "timestamp_IST"]).ok_or_else(|| missing("timestamp"))?;
        let action_col = column(&["action"]).ok_or_else(|| missing("action"))?;
        let price_col = column(&["price"]).ok_or_else(|| missing("price"))?;
        let status_col = column(&["status"]);

        let mut signals = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let row = i + 1;
            let record = record.map_err(|e| Error::read(BACKEND, e))?;
            let field = |col: usize| record.get(col).unwrap_or_default().to_string();

            let price = field(price_col).trim().parse::<f64>().map_err(|e| Error::Corrupt {
                row,
                reason: format!("invalid price: {e}"),
            })?;

            let signal = SignalRow {
                symbol: field(symbol_col),
                timestamp: field(timestamp_col),
                action: field(action_col),
                price,
                status: status_col.map(field),
            }
            .into_signal(row)?;
            signals.push(signal);
        }

        Ok(signals)
    }
}

#[async_trait]
impl SignalWriter for CsvSignalStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    /// Replaces the file contents with `signals`.
    ///
    /// Rows go to a staging file that is renamed over the target, so readers see
    /// either the previous file or the new one, never a truncated one.
    async fn write(&self, signals: &[Signal]) -> Result<()> {
        let store = self.clone();
        let signals = signals.to_vec();
        tokio::task::spawn_blocking(move || store.replace(&signals))
            .await
            .map_err(|e| Error::write(BACKEND, std::io::Error::other(e)))?
    }
}

#[async_trait]
impl SignalReader for CsvSignalStore {
    /// Reads every stored signal in file order. A missing file, or one without
    /// even a header row, is an empty store.
    ///
    /// Both the current five-column layout and the legacy layout without a
    /// `status` column are understood.
    async fn read(&self) -> Result<Vec<Signal>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| Error::read(BACKEND, std::io::Error::other(e)))?
    }
}
