// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to access symbol list: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid reference timezone offset: {0} minutes")]
    InvalidTimezone(i32),

    #[error("Poll interval must be at least one second")]
    InvalidInterval,
}

pub type Result<T> = std::result::Result<T, Error>;
