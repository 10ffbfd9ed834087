// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("No price data to assess")]
    NoData,

    #[error("Invalid moving average window: {0}")]
    InvalidWindow(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
