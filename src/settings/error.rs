//! Bootstrap settings errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid poll rate {0}: must be a positive number of tokens/second")]
    InvalidPollRate(f64),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
