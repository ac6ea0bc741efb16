use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::db;
use crate::errors::PersistError;
use crate::models::SeriesTable;

/// Upsert a series into its mapped destination database.
///
/// The connection is scoped to this call and closed on every exit path. The
/// whole batch runs in one transaction, so a failed row aborts the rest and
/// re-running with identical rows is a no-op.
pub async fn upsert_series(store: &StoreConfig, table: &SeriesTable) -> Result<u64, PersistError> {
    let ticker = table.ticker();
    let database = store
        .database_for(ticker)
        .ok_or_else(|| PersistError::UnmappedDestination(ticker.to_string()))?;

    if table.is_empty() {
        warn!("nothing to upsert for {ticker}; skipping store write");
        return Ok(0);
    }

    let options = PgConnectOptions::new()
        .host(&store.host)
        .port(store.port)
        .username(&store.user)
        .password(&store.password)
        .database(database);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(classify_connect_error)?;

    info!("connected to {database} at {}", store.host);

    let result = db::stock_queries::upsert_points(&pool, table.rows()).await;
    pool.close().await;

    let written = result.map_err(PersistError::WriteFailed)?;
    info!("upserted {written} rows into {database}.stock_data");
    Ok(written)
}

/// Postgres reports authentication failures with SQLSTATE class 28
/// (invalid_authorization_specification / invalid_password).
fn classify_connect_error(e: sqlx::Error) -> PersistError {
    match &e {
        sqlx::Error::Database(db) if db.code().is_some_and(|c| c.starts_with("28")) => {
            PersistError::AuthFailed(db.message().to_string())
        }
        _ => PersistError::ConnectionFailed(e.to_string()),
    }
}
