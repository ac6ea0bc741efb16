use async_trait::async_trait;
use thiserror::Error;

use crate::models::PricePoint;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response shape: {0}")]
    BadShape(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A source of daily quote history.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Full daily OHLCV history for `ticker`, oldest first, every row tagged
    /// with the ticker.
    async fn fetch_daily_history(&self, ticker: &str) -> Result<Vec<PricePoint>, FetchError>;
}
