// In crates/engine/src/lib.rs

pub mod reconciler;

use anyhow::{Context, Result};
use api_client::PriceSeriesProvider;
use app_config::types::PollSettings;
use chrono::FixedOffset;
use core_types::{Signal, Symbol};
use database::{SignalReader, SignalStore, SignalWriter};
use strategies::Strategy;

pub use crate::reconciler::reconcile;

/// Where the poll loop currently is. Purely informational; carried on log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Classifying,
    Reconciling,
    Writing,
    Sleeping,
}

/// What a single poll cycle did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Symbols read from the list this cycle.
    pub symbols: usize,
    /// Symbols that produced a fresh signal.
    pub fresh: usize,
    /// Symbols that returned no data (or failed to fetch) and were skipped.
    pub skipped: Vec<Symbol>,
    /// Rows handed to the writer, fresh and retained together.
    pub persisted: usize,
    /// Whether the writer accepted the set.
    pub written: bool,
}

/// The poll-classify-reconcile-write driver.
///
/// One symbol at a time, one cycle at a time. The only state that outlives a
/// cycle is what lives in the symbol list file and the signal store.
pub struct Engine {
    poll: PollSettings,
    zone: FixedOffset,
    strategy: Box<dyn Strategy + Send + Sync>,
    provider: Box<dyn PriceSeriesProvider + Send + Sync>,
    store: Box<dyn SignalStore + Send + Sync>,
}

impl Engine {
    pub fn new(
        poll: PollSettings,
        zone: FixedOffset,
        strategy: Box<dyn Strategy + Send + Sync>,
        provider: Box<dyn PriceSeriesProvider + Send + Sync>,
        store: Box<dyn SignalStore + Send + Sync>,
    ) -> Self {
        Self {
            poll,
            zone,
            strategy,
            provider,
            store,
        }
    }

    /// The main run method. Cycles forever; only process termination stops it.
    pub async fn run(&self) -> Result<()> {
        tracing::info!(
            strategy = self.strategy.name(),
            provider = self.provider.name(),
            store = self.store.name(),
            interval_secs = self.poll.interval_secs,
            "Starting poll loop."
        );

        loop {
            match self.run_cycle().await {
                Ok(report) => tracing::info!(
                    symbols = report.symbols,
                    fresh = report.fresh,
                    skipped = report.skipped.len(),
                    persisted = report.persisted,
                    written = report.written,
                    "Poll cycle complete."
                ),
                Err(e) => tracing::error!(error = %format!("{e:#}"), "Poll cycle abandoned."),
            }

            tracing::debug!(phase = ?Phase::Sleeping, secs = self.poll.interval_secs, "Sleeping until next cycle.");
            tokio::time::sleep(self.poll.sleep_duration()).await;
        }
    }

    /// Runs one full cycle: read symbols, fetch and classify each, reconcile
    /// against the stored set, write.
    ///
    /// A failed write is logged and reported, not returned, since the previous
    /// stored set stays authoritative. Errors are returned only when the cycle
    /// could not start: the symbol list or the stored set was unreadable.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        tracing::debug!(phase = ?Phase::Idle, "Starting poll cycle.");

        let (path, default_symbol) = (self.poll.symbols_file.clone(), self.poll.default_symbol.clone());
        let symbols = tokio::task::spawn_blocking(move || app_config::load_symbols(&path, &default_symbol))
            .await?
            .context("Failed to read the symbol list")?;
        let previous = self
            .store
            .read()
            .await
            .context("Failed to read the stored signals")?;

        let mut report = CycleReport {
            symbols: symbols.len(),
            ..CycleReport::default()
        };

        let mut fresh = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.assess_symbol(&symbol).await {
                Some(signal) => fresh.push(signal),
                None => report.skipped.push(symbol),
            }
        }
        report.fresh = fresh.len();

        tracing::debug!(phase = ?Phase::Reconciling, fresh = fresh.len(), previous = previous.len(), "Reconciling signals.");
        let merged = reconcile(fresh, &previous);
        report.persisted = merged.len();

        tracing::debug!(phase = ?Phase::Writing, count = merged.len(), "Writing signals.");
        match self.store.write(&merged).await {
            Ok(()) => report.written = true,
            Err(e) => tracing::error!(store = self.store.name(), error = %e, "Failed to write signals. Keeping the previous set."),
        }

        Ok(report)
    }

    /// Fetches and classifies one symbol. `None` means no data this cycle.
    async fn assess_symbol(&self, symbol: &Symbol) -> Option<Signal> {
        tracing::debug!(phase = ?Phase::Fetching, symbol = %symbol, "Fetching price series.");
        let bars = match self.provider.fetch(symbol, &self.poll.period, &self.poll.interval).await {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Fetch failed. Treating as no data.");
                return None;
            }
        };

        let Some(last) = bars.last() else {
            tracing::warn!(symbol = %symbol, "No data found. Skipping.");
            return None;
        };

        tracing::debug!(phase = ?Phase::Classifying, symbol = %symbol, bars = bars.len(), "Classifying.");
        match self.strategy.assess(&bars) {
            Ok(action) => {
                let signal = Signal::from_bar(symbol.clone(), last, action, &self.zone);
                tracing::info!(
                    symbol = %symbol,
                    action = %signal.action,
                    price = signal.price,
                    timestamp = %signal.timestamp,
                    "Prediction."
                );
                Some(signal)
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Could not classify. Skipping.");
                None
            }
        }
    }
}
