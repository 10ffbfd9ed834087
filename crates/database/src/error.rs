// In crates/database/src/error.rs

use thiserror::Error;

/// The backend-specific reason a read or write failed.
#[derive(Error, Debug)]
pub enum Cause {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to the signal store")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Failed to write signals to {backend} store: {cause}")]
    WriteFailed {
        backend: &'static str,
        #[source]
        cause: Cause,
    },

    #[error("Failed to read signals from {backend} store: {cause}")]
    ReadFailed {
        backend: &'static str,
        #[source]
        cause: Cause,
    },

    #[error("Corrupt signal row {row}: {reason}")]
    Corrupt { row: usize, reason: String },
}

impl Error {
    pub(crate) fn write(backend: &'static str, cause: impl Into<Cause>) -> Self {
        Error::WriteFailed { backend, cause: cause.into() }
    }

    pub(crate) fn read(backend: &'static str, cause: impl Into<Cause>) -> Self {
        Error::ReadFailed { backend, cause: cause.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
