// In crates/strategies/src/sma.rs

use core_types::PriceBar;
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

use crate::error::{Error, Result};

/// Trailing simple moving average of the closing price, one entry per bar.
///
/// An entry is `None` until `window` closes have been seen. Each defined entry
/// is computed from its own window, so rounding left over from closes that
/// have already dropped out never leaks into later values. A window of
/// identical closes averages to exactly that close.
pub fn close_sma(bars: &[PriceBar], window: usize) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(Error::InvalidWindow(window));
    }

    (0..bars.len())
        .map(|i| {
            if i + 1 < window {
                return Ok(None);
            }
            window_mean(&bars[i + 1 - window..=i]).map(Some)
        })
        .collect()
}

fn window_mean(slice: &[PriceBar]) -> Result<f64> {
    let first = slice[0].close;
    if slice.iter().all(|bar| bar.close == first) {
        return Ok(first);
    }

    let mut sma = Sma::new(slice.len()).map_err(|_| Error::InvalidWindow(slice.len()))?;
    Ok(slice.iter().fold(first, |_, bar| sma.next(bar.close)))
}
