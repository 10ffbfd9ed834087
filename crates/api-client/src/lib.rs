// In crates/api-client/src/lib.rs

use app_config::types::ProviderSettings;
use async_trait::async_trait;
use core_types::{PriceBar, Symbol};
use std::time::Duration;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// The universal interface for a source of historical price bars.
///
/// Implementations return bars in chronological order, most recent last. An
/// empty vector is a valid answer and means the symbol had no data for the
/// requested window.
#[async_trait]
pub trait PriceSeriesProvider {
    /// The name of the provider (e.g., "YahooChart").
    fn name(&self) -> &'static str;

    /// Fetches `symbol` over a lookback `period` sampled every `interval`.
    async fn fetch(&self, symbol: &Symbol, period: &str, interval: &str) -> Result<Vec<PriceBar>>;
}

impl ChartClient {
    /// Constructs a new ChartClient from ProviderSettings.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; crossover-signals/0.1)")
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(ChartClient {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceSeriesProvider for ChartClient {
    fn name(&self) -> &'static str {
        "YahooChart"
    }

    /// Fetches chart data.
    ///
    /// This corresponds to the `GET /v8/finance/chart/{symbol}` endpoint.
    async fn fetch(&self, symbol: &Symbol, period: &str, interval: &str) -> Result<Vec<PriceBar>> {
        let url = format!("{}/{}", self.base_url, symbol.0);

        let response_body = self
            .http_client
            .get(&url)
            .query(&[("range", period), ("interval", interval)])
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        // The endpoint reports unknown symbols inside the JSON body, often with a
        // non-2xx status, so the body is always parsed before deciding.
        let response: ChartResponse =
            serde_json::from_str(&response_body).map_err(Error::DeserializationFailed)?;
        let bars = response.into_bars()?;

        tracing::debug!(symbol = %symbol, count = bars.len(), period, interval, "Fetched price bars.");
        Ok(bars)
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &ProviderSettings) -> Result<ChartClient> {
    ChartClient::new(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_normalizes_base_url() {
        let settings = ProviderSettings {
            base_url: "http://localhost:9999/chart/".to_string(),
            timeout_secs: 1,
        };
        let client = ChartClient::new(&settings).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/chart");
        assert_eq!(client.name(), "YahooChart");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let settings = ProviderSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let client = ChartClient::new(&settings).unwrap();
        let result = client.fetch(&Symbol::from("TCS.NS"), "1d", "15m").await;
        assert!(matches!(result, Err(Error::RequestFailed(_))));
    }
}
