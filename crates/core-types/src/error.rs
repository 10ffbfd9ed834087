// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown signal status: {0}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
