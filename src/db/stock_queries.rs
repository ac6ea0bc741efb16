use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::error;

use crate::models::PricePoint;

/// Upsert a batch of price points keyed on (ticker, date), one transaction.
/// Re-running with identical rows changes nothing; a failed row aborts the
/// whole batch.
pub async fn upsert_points(pool: &PgPool, points: &[PricePoint]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    for p in points {
        if let Err(e) = sqlx::query(
            r#"
            INSERT INTO stock_data (date, open, high, low, close, volume, ticker)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (ticker, date)
            DO UPDATE SET
                open = EXCLUDED.open,
                high = EXCLUDED.high,
                low = EXCLUDED.low,
                close = EXCLUDED.close,
                volume = EXCLUDED.volume
            "#,
        )
        .bind(p.date)
        .bind(p.open)
        .bind(p.high)
        .bind(p.low)
        .bind(p.close)
        .bind(p.volume)
        .bind(&p.ticker)
        .execute(&mut *tx)
        .await
        {
            error!(
                "failed to upsert {} bar for {} : {}",
                p.date, p.ticker, e
            );
            return Err(e);
        }
    }

    tx.commit().await?;
    Ok(points.len() as u64)
}

/// All stored history for a ticker, oldest first.
#[allow(dead_code)]
pub async fn fetch_all(pool: &PgPool, ticker: &str) -> Result<Vec<PricePoint>, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT date, open, high, low, close, volume, ticker
        FROM stock_data
        WHERE ticker = $1
        ORDER BY date ASC
        "#,
    )
    .bind(ticker)
    .fetch_all(pool)
    .await
}

/// Stored history restricted to [start, end], oldest first.
#[allow(dead_code)]
pub async fn fetch_window(
    pool: &PgPool,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PricePoint>, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT date, open, high, low, close, volume, ticker
        FROM stock_data
        WHERE ticker = $1 AND date BETWEEN $2 AND $3
        ORDER BY date ASC
        "#,
    )
    .bind(ticker)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// The most recent `limit` bars for a ticker, returned oldest first.
#[allow(dead_code)]
pub async fn fetch_latest(
    pool: &PgPool,
    ticker: &str,
    limit: i64,
) -> Result<Vec<PricePoint>, sqlx::Error> {
    sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT date, open, high, low, close, volume, ticker
        FROM stock_data
        WHERE ticker = $1
        ORDER BY date DESC
        LIMIT $2
        "#,
    )
    .bind(ticker)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map(|mut points| {
        points.reverse();
        points
    })
}
