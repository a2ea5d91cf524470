//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by `ScoringEngine`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoringError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors a reply sink reports back to the dispatcher.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("reply channel closed")]
    Closed,
}

/// Errors emitted while loading `BotConfig`.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {key}: {raw}")]
    InvalidValue { key: &'static str, raw: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}
