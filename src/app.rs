use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::price_provider::QuoteProvider;
use crate::models::{ComparisonTable, ReportMetrics, SeriesTable};
use crate::services::{
    chart_service, comparison_service, csv_export_service, series_service, store_service,
};

/// Per-run outcome report: which tickers fetched, what failed, and the
/// comparison metrics when both series were available.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub fetched: Vec<String>,
    pub fetch_failures: Vec<(String, String)>,
    pub persist_failures: Vec<(String, String)>,
    pub comparison_ran: bool,
    pub metrics: Option<ReportMetrics>,
}

/// Fetch both configured tickers, persist each series (best-effort), then
/// compare and emit the report artifacts.
///
/// A fetch failure excludes that ticker and skips the comparison; a
/// persistence failure is logged and recorded but the series still
/// participates in the comparison.
pub async fn run(
    config: &AppConfig,
    provider: &dyn QuoteProvider,
) -> Result<RunSummary, AppError> {
    let end = Utc::now().date_naive();
    let start = end - Duration::days(config.window_days);
    info!(
        "comparing {} vs {} over [{start}, {end}]",
        config.ticker_a, config.ticker_b
    );

    let mut summary = RunSummary::default();
    let mut tables: Vec<SeriesTable> = Vec::new();

    for ticker in [&config.ticker_a, &config.ticker_b] {
        match series_service::fetch_series(provider, ticker, start, end).await {
            Ok(table) => {
                persist_series(config, &table, &mut summary).await;
                summary.fetched.push(ticker.clone());
                tables.push(table);
            }
            Err(e) => {
                error!("failed to fetch {ticker}: {e}");
                summary.fetch_failures.push((ticker.clone(), e.to_string()));
            }
        }
    }

    if let [table_a, table_b] = &tables[..] {
        let (comparison, metrics) = comparison_service::compare(table_a, table_b)?;
        csv_export_service::export_comparison(&comparison, &config.output_dir)?;

        let chart_path = config.output_dir.join(format!(
            "{}_vs_{}_performance.svg",
            comparison.ticker_a.to_lowercase(),
            comparison.ticker_b.to_lowercase()
        ));
        // The chart is an artifact only; its failure does not void the metrics
        if let Err(e) = chart_service::render_normalized_chart(&comparison, &chart_path) {
            warn!("chart rendering failed: {e:#}");
        }

        report_metrics(&comparison, &metrics);
        summary.comparison_ran = true;
        summary.metrics = Some(metrics);
    } else {
        warn!("could not retrieve data for both tickers; comparison skipped");
    }

    Ok(summary)
}

async fn persist_series(config: &AppConfig, table: &SeriesTable, summary: &mut RunSummary) {
    if let Err(e) = csv_export_service::export_series(table, &config.output_dir) {
        error!("CSV export failed for {}: {e}", table.ticker());
        summary
            .persist_failures
            .push((table.ticker().to_string(), e.to_string()));
    }

    match &config.store {
        Some(store) => {
            if let Err(e) = store_service::upsert_series(store, table).await {
                error!("store upsert failed for {}: {e}", table.ticker());
                summary
                    .persist_failures
                    .push((table.ticker().to_string(), e.to_string()));
            }
        }
        None => debug!("no store configured; skipping upsert for {}", table.ticker()),
    }
}

fn report_metrics(comparison: &ComparisonTable, metrics: &ReportMetrics) {
    info!(
        "comparative analysis: {} vs {}",
        comparison.ticker_a, comparison.ticker_b
    );
    match metrics.correlation {
        Some(c) => info!("correlation of daily returns: {:.2}%", c * 100.0),
        None => info!("correlation of daily returns: n/a"),
    }
    report_volatility(&comparison.ticker_a, metrics.volatility_a);
    report_volatility(&comparison.ticker_b, metrics.volatility_b);
    info!(
        "{} total return: {:+.2}%",
        comparison.ticker_a, metrics.total_return_a
    );
    info!(
        "{} total return: {:+.2}%",
        comparison.ticker_b, metrics.total_return_b
    );

    let tail_from = comparison.rows.len().saturating_sub(3);
    for row in &comparison.rows[tail_from..] {
        info!(
            "{}  close {:.2} / {:.2}  norm {:.2} / {:.2}",
            row.date, row.close_a, row.close_b, row.norm_a, row.norm_b
        );
    }
}

fn report_volatility(ticker: &str, volatility: Option<f64>) {
    match volatility {
        Some(v) => info!("{ticker} volatility: {:.2}%", v * 100.0),
        None => info!("{ticker} volatility: n/a"),
    }
}
