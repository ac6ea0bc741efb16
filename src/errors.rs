use thiserror::Error;

use crate::external::price_provider::FetchError;
use crate::services::comparison_service::ComparisonError;

/// Failures of either persistence sink (file or store).
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("store connection failed: {0}")]
    ConnectionFailed(String),

    #[error("store authentication failed: {0}")]
    AuthFailed(String),

    #[error("no destination database configured for ticker {0}")]
    UnmappedDestination(String),

    #[error("store write failed: {0}")]
    WriteFailed(#[source] sqlx::Error),

    #[error("file write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}
