// In crates/strategies/src/ma_crossover.rs

use crate::error::{Error, Result};
use crate::sma::close_sma;
use crate::types::MACrossoverSettings;
use crate::Strategy;
use core_types::{Action, PriceBar};

/// A per-bar crossover event, used for charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    Buy,
    Sell,
}

/// The dual simple moving average crossover strategy.
#[derive(Debug, Clone)]
pub struct MACrossover {
    /// The configuration for this strategy instance.
    settings: MACrossoverSettings,
}

impl MACrossover {
    /// Creates a new `MACrossover` strategy instance from its settings.
    ///
    /// Both windows must be at least one bar wide.
    pub fn new(settings: MACrossoverSettings) -> Result<Self> {
        for window in [settings.short_window, settings.long_window] {
            if window == 0 {
                return Err(Error::InvalidWindow(window));
            }
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MACrossoverSettings {
        &self.settings
    }

    /// Produces one marker per bar by comparing the fast and slow averages of
    /// consecutive bars. The first bar never carries a marker.
    ///
    /// The returned iterator is `Clone`, so it can be replayed without
    /// recomputing the averages.
    pub fn markers(&self, bars: &[PriceBar]) -> Result<Markers> {
        Ok(Markers {
            short: close_sma(bars, self.settings.short_window)?,
            long: close_sma(bars, self.settings.long_window)?,
            index: 0,
        })
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "MACrossover"
    }

    fn assess(&self, bars: &[PriceBar]) -> Result<Action> {
        if bars.is_empty() {
            return Err(Error::NoData);
        }

        let short = close_sma(bars, self.settings.short_window)?;
        let long = close_sma(bars, self.settings.long_window)?;

        // Only the final bar matters. An undefined average compares as
        // neither above nor below, which falls through to Hold.
        let action = match (short.last().copied().flatten(), long.last().copied().flatten()) {
            (Some(fast), Some(slow)) if fast > slow => Action::Buy,
            (Some(fast), Some(slow)) if fast < slow => Action::Sell,
            _ => Action::Hold,
        };

        Ok(action)
    }
}

/// Lazily evaluated crossover markers, same length as the input series.
#[derive(Debug, Clone)]
pub struct Markers {
    short: Vec<Option<f64>>,
    long: Vec<Option<f64>>,
    index: usize,
}

impl Markers {
    fn marker_at(&self, i: usize) -> Marker {
        if i == 0 {
            return Marker::None;
        }

        let (Some(fast), Some(slow), Some(prev_fast), Some(prev_slow)) =
            (self.short[i], self.long[i], self.short[i - 1], self.long[i - 1])
        else {
            return Marker::None;
        };

        if fast > slow && prev_fast <= prev_slow {
            // Fast line just crossed above the slow line.
            Marker::Buy
        } else if fast < slow && prev_fast >= prev_slow {
            // Fast line just crossed below the slow line.
            Marker::Sell
        } else {
            Marker::None
        }
    }
}

impl Iterator for Markers {
    type Item = Marker;

    fn next(&mut self) -> Option<Marker> {
        if self.index >= self.short.len() {
            return None;
        }
        let marker = self.marker_at(self.index);
        self.index += 1;
        Some(marker)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.short.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Markers {}
