//! Error types for the server binary

use newsrank_core::FeedError;
use thiserror::Error;

/// Result type for server operations
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while starting or running the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Feed error: {0}")]
    FeedError(#[from] FeedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        ServerError::ConfigurationError(err.to_string())
    }
}
