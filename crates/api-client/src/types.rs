// In crates/api-client/src/types.rs

use chrono::{TimeZone, Utc};
use core_types::PriceBar;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};

/// The client for the Yahoo Finance chart endpoint.
#[derive(Debug, Clone)]
pub struct ChartClient {
    pub(crate) http_client: Client,
    pub(crate) base_url: String,
}

// --- Raw response structures ---

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    /// Bar open times, in seconds since the epoch.
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<Quote>,
}

/// Parallel OHLCV columns. Entries are null for bars the exchange skipped.
#[derive(Debug, Deserialize, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Converts the column-oriented response into chronological bars.
    ///
    /// Bars with any missing field are dropped. An absent result is an empty
    /// series, not an error; the caller decides what "no data" means.
    pub fn into_bars(self) -> Result<Vec<PriceBar>> {
        if let Some(error) = self.chart.error {
            return Err(Error::ApiError { code: error.code, msg: error.description });
        }

        let Some(data) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars: Vec<PriceBar> = timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &secs)| {
                let field = |column: &Vec<Option<f64>>| column.get(i).copied().flatten();
                Some(PriceBar {
                    timestamp: Utc.timestamp_opt(secs, 0).single()?,
                    open: field(&quote.open)?,
                    high: field(&quote.high)?,
                    low: field(&quote.low)?,
                    close: field(&quote.close)?,
                    volume: field(&quote.volume).unwrap_or(0.0),
                })
            })
            .collect();

        bars.sort_by_key(|bar| bar.timestamp);
        Ok(bars)
    }
}
