// In crates/database/src/sqlite_store.rs

use async_trait::async_trait;
use core_types::Signal;
use sqlx::sqlite::{self, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::record::SignalRow;
use crate::{SignalReader, SignalWriter};

const BACKEND: &str = "sqlite";

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS signals (
        symbol TEXT,
        timestamp TEXT,
        action TEXT,
        price REAL,
        status TEXT
    )
"#;

/// A wrapper around the `sqlx` pool for the `signals` table.
#[derive(Debug, Clone)]
pub struct SqliteSignalStore(SqlitePool);

impl SqliteSignalStore {
    /// Opens (creating if missing) the database file and ensures the table exists.
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::write(BACKEND, e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(Error::ConnectionError)?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(Error::ConnectionError)?;
        upgrade_legacy_table(&pool).await.map_err(Error::ConnectionError)?;

        Ok(Self(pool))
    }
}

/// Brings a table created by earlier versions of the writer up to the current
/// layout: `timestamp_IST` becomes `timestamp`, and a missing `status` column is
/// added (existing rows read back as active).
async fn upgrade_legacy_table(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('signals')")
        .fetch_all(pool)
        .await?;
    let has = |name: &str| columns.iter().any(|c| c == name);

    if has("timestamp_IST") && !has("timestamp") {
        tracing::info!("Renaming legacy `timestamp_IST` column.");
        sqlx::query("ALTER TABLE signals RENAME COLUMN timestamp_IST TO timestamp")
            .execute(pool)
            .await?;
    }
    if !has("status") {
        tracing::info!("Adding missing `status` column.");
        sqlx::query("ALTER TABLE signals ADD COLUMN status TEXT")
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl SignalWriter for SqliteSignalStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    /// Deletes every row and inserts `signals` inside one transaction.
    ///
    /// If any statement fails the transaction is dropped without commit, which
    /// rolls it back and leaves the previous rows in place.
    async fn write(&self, signals: &[Signal]) -> Result<()> {
        let mut tx = self.0.begin().await.map_err(|e| Error::write(BACKEND, e))?;

        sqlx::query(CREATE_TABLE)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::write(BACKEND, e))?;

        sqlx::query("DELETE FROM signals")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::write(BACKEND, e))?;

        for signal in signals {
            let row = SignalRow::from(signal);
            sqlx::query(
                r#"
                INSERT INTO signals (symbol, timestamp, action, price, status)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.symbol)
            .bind(row.timestamp)
            .bind(row.action)
            .bind(row.price)
            .bind(row.status)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::write(BACKEND, e))?;
        }

        tx.commit().await.map_err(|e| Error::write(BACKEND, e))?;

        tracing::debug!(count = signals.len(), "Signals written to SQLite.");
        Ok(())
    }
}

#[async_trait]
impl SignalReader for SqliteSignalStore {
    /// Reads every stored signal in insertion order.
    async fn read(&self) -> Result<Vec<Signal>> {
        let rows = sqlx::query_as::<_, (String, String, String, f64, Option<String>)>(
            "SELECT symbol, timestamp, action, price, status FROM signals ORDER BY rowid",
        )
        .fetch_all(&self.0)
        .await
        .map_err(|e| Error::read(BACKEND, e))?;

        rows.into_iter()
            .enumerate()
            .map(|(i, (symbol, timestamp, action, price, status))| {
                SignalRow { symbol, timestamp, action, price, status }.into_signal(i + 1)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use core_types::{Action, SignalStatus, Symbol};

    fn signal(symbol: &str, timestamp: &str, action: Action, status: SignalStatus) -> Signal {
        Signal {
            symbol: Symbol::from(symbol),
            timestamp: DateTime::<FixedOffset>::parse_from_rfc3339(timestamp).unwrap(),
            action,
            price: 101.75,
            status,
        }
    }

    #[tokio::test]
    async fn test_second_write_fully_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteSignalStore::connect(&dir.path().join("signals.db")).await.unwrap();

        let first = vec![
            signal("A", "2025-03-14T09:15:00+05:30", Action::Buy, SignalStatus::Active),
            signal("B", "2025-03-14T09:15:00+05:30", Action::Sell, SignalStatus::Active),
        ];
        let second = vec![
            signal("C", "2025-03-14T09:30:00+05:30", Action::Hold, SignalStatus::Active),
            signal("A", "2025-03-14T09:15:00+05:30", Action::Buy, SignalStatus::Inactive),
        ];

        store.write(&first).await.unwrap();
        store.write(&second).await.unwrap();

        assert_eq!(store.read().await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_rows_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.db");
        let rows = vec![signal("TCS.NS", "2025-03-14T15:15:00+05:30", Action::Sell, SignalStatus::Active)];

        SqliteSignalStore::connect(&path).await.unwrap().write(&rows).await.unwrap();
        let reopened = SqliteSignalStore::connect(&path).await.unwrap();

        assert_eq!(reopened.read().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteSignalStore::connect(&dir.path().join("signals.db")).await.unwrap();

        let kept = vec![signal("A", "2025-03-14T09:15:00+05:30", Action::Buy, SignalStatus::Active)];
        store.write(&kept).await.unwrap();

        sqlx::query(
            "CREATE TRIGGER reject_inserts BEFORE INSERT ON signals BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&store.0)
        .await
        .unwrap();

        let replacement = vec![signal("B", "2025-03-14T09:30:00+05:30", Action::Sell, SignalStatus::Active)];
        let result = store.write(&replacement).await;

        assert!(matches!(result, Err(Error::WriteFailed { backend: "sqlite", .. })));
        assert_eq!(store.read().await.unwrap(), kept);
    }

    #[tokio::test]
    async fn test_legacy_table_is_upgraded_on_connect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.db");

        let options = SqliteConnectOptions::new().filename(&path).create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        sqlx::query("CREATE TABLE signals (symbol TEXT, timestamp_IST TEXT, action TEXT, price REAL, status TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO signals VALUES ('TCS.NS', '2025-03-14 15:15:00+05:30', 'Sell', 101.75, 'inactive')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let store = SqliteSignalStore::connect(&path).await.unwrap();

        assert_eq!(
            store.read().await.unwrap(),
            vec![signal("TCS.NS", "2025-03-14T15:15:00+05:30", Action::Sell, SignalStatus::Inactive)]
        );

        let rows = vec![signal("INFY.NS", "2025-03-14T15:30:00+05:30", Action::Buy, SignalStatus::Active)];
        store.write(&rows).await.unwrap();
        assert_eq!(store.read().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn test_table_without_status_reads_as_active() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.db");

        let options = SqliteConnectOptions::new().filename(&path).create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        sqlx::query("CREATE TABLE signals (symbol TEXT, timestamp_IST TEXT, action TEXT, price REAL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO signals VALUES ('A', '2025-03-14T09:15:00+05:30', 'Buy', 101.75)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let store = SqliteSignalStore::connect(&path).await.unwrap();

        assert_eq!(
            store.read().await.unwrap(),
            vec![signal("A", "2025-03-14T09:15:00+05:30", Action::Buy, SignalStatus::Active)]
        );
    }

    #[tokio::test]
    async fn test_fresh_database_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteSignalStore::connect(&dir.path().join("data").join("signals.db")).await.unwrap();
        assert!(store.read().await.unwrap().is_empty());
    }
}
