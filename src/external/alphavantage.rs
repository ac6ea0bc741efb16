use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::external::price_provider::{FetchError, QuoteProvider};
use crate::models::PricePoint;

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

}

#[derive(Debug, Deserialize)]
struct AvDailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, AvDailyBar>>,

    // When throttled Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // When the symbol or call is invalid:
    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Flatten the provider response into tagged price points, oldest first.
/// The BTreeMap keys are "YYYY-MM-DD" strings, so iteration order is already
/// ascending by date.
fn parse_response(body: AvDailyResponse, ticker: &str) -> Result<Vec<PricePoint>, FetchError> {
    if body.note.is_some() {
        return Err(FetchError::RateLimited);
    }

    if let Some(msg) = body.error_message {
        return Err(FetchError::BadShape(msg));
    }

    let series = body
        .time_series
        .ok_or_else(|| FetchError::BadShape("missing \"Time Series (Daily)\" key".into()))?;

    let mut out = Vec::with_capacity(series.len());
    for (date_str, bar) in series {
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| FetchError::BadShape(format!("bad date {date_str}: {e}")))?;

        out.push(PricePoint::new(
            ticker,
            date,
            parse_field(&bar.open, "open")?,
            parse_field(&bar.high, "high")?,
            parse_field(&bar.low, "low")?,
            parse_field(&bar.close, "close")?,
            bar.volume
                .parse::<i64>()
                .map_err(|e| FetchError::BadShape(format!("bad volume {}: {e}", bar.volume)))?,
        ));
    }

    Ok(out)
}

fn parse_field(raw: &str, name: &str) -> Result<f64, FetchError> {
    raw.parse::<f64>()
        .map_err(|e| FetchError::BadShape(format!("bad {name} {raw}: {e}")))
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    async fn fetch_daily_history(&self, ticker: &str) -> Result<Vec<PricePoint>, FetchError> {
        // outputsize=full returns the complete history; the caller windows it
        let url = "https://www.alphavantage.co/query";

        let resp = self
            .client
            .get(url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", ticker),
                ("outputsize", "full"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body = resp
            .json::<AvDailyResponse>()
            .await
            .map_err(|e| FetchError::BadShape(e.to_string()))?;

        parse_response(body, ticker)
    }
}
