use chrono::NaiveDate;
use tracing::{debug, info};

use crate::external::price_provider::{FetchError, QuoteProvider};
use crate::models::SeriesTable;

/// Fetch the full daily history for `ticker` and restrict it to the
/// inclusive `[start, end]` window, ascending by date.
pub async fn fetch_series(
    provider: &dyn QuoteProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SeriesTable, FetchError> {
    if ticker.trim().is_empty() {
        return Err(FetchError::InvalidRequest("empty ticker".into()));
    }
    if start > end {
        return Err(FetchError::InvalidRequest(format!(
            "window start {start} is after end {end}"
        )));
    }

    let history = provider.fetch_daily_history(ticker).await?;
    debug!("{} bars of raw history for {}", history.len(), ticker);

    let windowed: Vec<_> = history
        .into_iter()
        .filter(|p| p.date >= start && p.date <= end)
        .collect();

    let table = SeriesTable::from_rows(ticker, windowed);
    info!(
        "fetched {} bars for {} in [{start}, {end}]",
        table.len(),
        ticker
    );

    Ok(table)
}
