// In crates/strategies/src/lib.rs

use core_types::{Action, PriceBar};
pub mod error;
pub mod ma_crossover;
pub mod sma;
pub mod types;

pub use error::{Error, Result};
pub use ma_crossover::{MACrossover, Marker, Markers};

/// The universal interface for a signal strategy.
///
/// A strategy looks at a chronological price series (most recent bar last) and
/// classifies the final bar. Strategies are pure: the same series always yields
/// the same answer, so no state is carried between poll cycles.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Classifies the last bar of `bars`.
    ///
    /// Fails with `Error::NoData` when the series is empty.
    fn assess(&self, bars: &[PriceBar]) -> Result<Action>;
}
