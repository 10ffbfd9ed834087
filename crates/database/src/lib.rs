// In crates/database/src/lib.rs

use app_config::StoreBackend;
use app_config::types::StoreSettings;
use async_trait::async_trait;
use core_types::Signal;

pub mod csv_store;
pub mod error;
mod record;
pub mod sqlite_store;

// Re-export the most important types for easy access.
pub use csv_store::CsvSignalStore;
pub use error::{Error, Result};
pub use record::COLUMNS;
pub use sqlite_store::SqliteSignalStore;

/// The universal interface for persisting the latest signal set.
///
/// Every call is a full replace: afterwards the store holds exactly `signals`,
/// in order, and nothing from earlier writes.
#[async_trait]
pub trait SignalWriter {
    /// The name of the backend (e.g., "csv", "sqlite").
    fn name(&self) -> &'static str;

    async fn write(&self, signals: &[Signal]) -> Result<()>;
}

/// Reads back whatever the matching `SignalWriter` last persisted.
#[async_trait]
pub trait SignalReader {
    async fn read(&self) -> Result<Vec<Signal>>;
}

/// A backend that can both read and write the signal set.
pub trait SignalStore: SignalReader + SignalWriter {}

impl<T: SignalReader + SignalWriter> SignalStore for T {}

/// Opens the backend selected in the store settings.
pub async fn open_store(settings: &StoreSettings) -> Result<Box<dyn SignalStore + Send + Sync>> {
    let store: Box<dyn SignalStore + Send + Sync> = match settings.backend {
        StoreBackend::Csv => Box::new(CsvSignalStore::new(&settings.csv_path)),
        StoreBackend::Sqlite => Box::new(SqliteSignalStore::connect(&settings.sqlite_path).await?),
    };
    tracing::info!(backend = store.name(), "Signal store opened.");
    Ok(store)
}
