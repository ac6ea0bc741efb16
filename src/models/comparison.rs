use chrono::NaiveDate;
use serde::Serialize;

/// One joined row of the two-ticker comparison. `norm_*` rebases each close
/// so the first joined date equals 100.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub close_a: f64,
    pub close_b: f64,
    pub norm_a: f64,
    pub norm_b: f64,
}

/// The inner join of two series on date, oldest first.
#[derive(Debug, Clone)]
pub struct ComparisonTable {
    pub ticker_a: String,
    pub ticker_b: String,
    pub rows: Vec<ComparisonRow>,
}

/// Summary metrics over the joined daily-return sequences.
///
/// `correlation` and the volatilities are `None` when fewer than two joined
/// rows exist (no returns to aggregate) or a return sequence has zero
/// variance.
#[derive(Debug, Clone)]
pub struct ReportMetrics {
    pub correlation: Option<f64>,
    pub volatility_a: Option<f64>,
    pub volatility_b: Option<f64>,
    pub total_return_a: f64,
    pub total_return_b: f64,
}
