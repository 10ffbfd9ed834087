// In crates/core-types/src/types.rs

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A ticker symbol as understood by the price provider (e.g., "RELIANCE.NS").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

/// One OHLCV sample returned by the price provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// The classification of the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "Buy",
            Action::Sell => "Sell",
            Action::Hold => "Hold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Buy" | "BUY" | "buy" => Ok(Action::Buy),
            "Sell" | "SELL" | "sell" => Ok(Action::Sell),
            "Hold" | "HOLD" | "hold" => Ok(Action::Hold),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

/// Whether a persisted signal is the latest known one for its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignalStatus {
    #[default]
    Active,
    Inactive,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Active => "active",
            SignalStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(SignalStatus::Active),
            "inactive" => Ok(SignalStatus::Inactive),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// A classified observation for one symbol, as persisted in the signal store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: Symbol,
    /// The bar time, expressed in the configured reference zone.
    pub timestamp: DateTime<FixedOffset>,
    pub action: Action,
    /// Closing price of the bar at `timestamp`.
    pub price: f64,
    pub status: SignalStatus,
}

impl Signal {
    /// Builds a fresh, active signal from the last bar of a series.
    pub fn from_bar(symbol: Symbol, bar: &PriceBar, action: Action, zone: &FixedOffset) -> Self {
        Self {
            symbol,
            timestamp: bar.timestamp.with_timezone(zone),
            action,
            price: bar.close,
            status: SignalStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SignalStatus::Active
    }

    /// Returns a copy of this signal with its status flipped to inactive.
    pub fn deactivated(&self) -> Self {
        Self {
            status: SignalStatus::Inactive,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_action_parsing_is_case_tolerant() {
        assert_eq!("Buy".parse::<Action>(), Ok(Action::Buy));
        assert_eq!("SELL".parse::<Action>(), Ok(Action::Sell));
        assert_eq!(" hold ".parse::<Action>(), Ok(Action::Hold));
        assert!("Short".parse::<Action>().is_err());
    }

    #[test]
    fn test_status_round_trips_through_display() {
        for status in [SignalStatus::Active, SignalStatus::Inactive] {
            assert_eq!(status.to_string().parse::<SignalStatus>(), Ok(status));
        }
        assert!("stale".parse::<SignalStatus>().is_err());
    }

    #[test]
    fn test_from_bar_normalizes_to_reference_zone() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let bar = PriceBar {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 4, 0, 0).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 100.0,
        };

        let signal = Signal::from_bar(Symbol::from("TCS.NS"), &bar, Action::Buy, &ist);

        assert_eq!(signal.timestamp.to_rfc3339(), "2025-03-14T09:30:00+05:30");
        assert_eq!(signal.timestamp, bar.timestamp);
        assert_eq!(signal.price, 1.5);
        assert!(signal.is_active());
        assert_eq!(signal.deactivated().status, SignalStatus::Inactive);
    }
}
