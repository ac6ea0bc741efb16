use std::path::{Path, PathBuf};

use chrono::Utc;
use csv::{ReaderBuilder, WriterBuilder};
use tracing::{info, warn};

use crate::errors::PersistError;
use crate::models::{ComparisonTable, PricePoint, SeriesTable};

/// Write a series to `<TICKER>_stock_data_<YYYYMMDD>.csv` under `out_dir`.
/// Returns `Ok(None)` (logged) when the table has nothing to write.
pub fn export_series(
    table: &SeriesTable,
    out_dir: &Path,
) -> Result<Option<PathBuf>, PersistError> {
    if table.is_empty() {
        warn!("nothing to write for {}; skipping CSV export", table.ticker());
        return Ok(None);
    }

    let filename = format!(
        "{}_stock_data_{}.csv",
        table.ticker(),
        Utc::now().format("%Y%m%d")
    );
    let path = out_dir.join(filename);

    let mut writer = WriterBuilder::new().has_headers(true).from_path(&path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(Some(path))
}

/// Read a previously exported series file back into a table. The ticker is
/// taken from the rows themselves.
pub fn read_series(path: &Path) -> Result<SeriesTable, PersistError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut rows: Vec<PricePoint> = Vec::new();
    for record in reader.deserialize::<PricePoint>() {
        rows.push(record?);
    }

    let ticker = rows
        .first()
        .map(|p| p.ticker.clone())
        .unwrap_or_default();
    Ok(SeriesTable::from_rows(ticker, rows))
}

/// Write the joined comparison table to `<A>_<B>_comparison.csv`.
pub fn export_comparison(
    table: &ComparisonTable,
    out_dir: &Path,
) -> Result<PathBuf, PersistError> {
    let filename = format!("{}_{}_comparison.csv", table.ticker_a, table.ticker_b);
    let path = out_dir.join(filename);

    let mut writer = WriterBuilder::new().has_headers(true).from_path(&path)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(
        "wrote comparison table ({} rows) to {}",
        table.rows.len(),
        path.display()
    );
    Ok(path)
}
