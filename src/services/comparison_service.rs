use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ComparisonRow, ComparisonTable, PricePoint, ReportMetrics, SeriesTable};
use crate::services::indicators;

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("no overlapping dates between {0} and {1}")]
    EmptyOverlap(String, String),
}

/// Inner-join two series on date and derive the comparison report.
///
/// Dates present in only one series are dropped. The normalization base for
/// each series is its close on the earliest *joined* date — not the earliest
/// date of the raw series — so `norm` is always 100 on the first row.
pub fn compare(
    a: &SeriesTable,
    b: &SeriesTable,
) -> Result<(ComparisonTable, ReportMetrics), ComparisonError> {
    let b_by_date: HashMap<NaiveDate, &PricePoint> =
        b.rows().iter().map(|p| (p.date, p)).collect();

    // a is ascending, so the joined rows come out ascending too
    let joined: Vec<(NaiveDate, f64, f64)> = a
        .rows()
        .iter()
        .filter_map(|pa| b_by_date.get(&pa.date).map(|pb| (pa.date, pa.close, pb.close)))
        .collect();

    let (base_a, base_b) = match joined.first() {
        Some(&(_, close_a, close_b)) => (close_a, close_b),
        None => {
            return Err(ComparisonError::EmptyOverlap(
                a.ticker().to_string(),
                b.ticker().to_string(),
            ))
        }
    };

    let rows: Vec<ComparisonRow> = joined
        .iter()
        .map(|&(date, close_a, close_b)| ComparisonRow {
            date,
            close_a,
            close_b,
            norm_a: close_a / base_a * 100.0,
            norm_b: close_b / base_b * 100.0,
        })
        .collect();

    let closes_a: Vec<f64> = rows.iter().map(|r| r.close_a).collect();
    let closes_b: Vec<f64> = rows.iter().map(|r| r.close_b).collect();
    let returns_a = indicators::daily_returns(&closes_a);
    let returns_b = indicators::daily_returns(&closes_b);

    let last = rows.last().expect("joined table is non-empty");
    let metrics = ReportMetrics {
        correlation: indicators::pearson_correlation(&returns_a, &returns_b),
        volatility_a: indicators::sample_std_dev(&returns_a),
        volatility_b: indicators::sample_std_dev(&returns_b),
        total_return_a: last.norm_a - 100.0,
        total_return_b: last.norm_b - 100.0,
    };

    let table = ComparisonTable {
        ticker_a: a.ticker().to_string(),
        ticker_b: b.ticker().to_string(),
        rows,
    };

    Ok((table, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(ticker: &str, bars: &[(&str, f64)]) -> SeriesTable {
        let rows = bars
            .iter()
            .map(|&(date, close)| {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
                PricePoint::new(ticker, date, close, close, close, close, 1_000)
            })
            .collect();
        SeriesTable::from_rows(ticker, rows)
    }

    fn close_to(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn join_keeps_exactly_the_date_intersection() {
        let a = series(
            "SPOT",
            &[
                ("2024-01-01", 100.0),
                ("2024-01-02", 110.0),
                ("2024-01-04", 120.0),
            ],
        );
        let b = series(
            "SIRI",
            &[
                ("2024-01-02", 50.0),
                ("2024-01-03", 51.0),
                ("2024-01-04", 52.0),
            ],
        );

        let (table, _) = compare(&a, &b).unwrap();
        let dates: Vec<String> = table.rows.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-04"]);
    }

    #[test]
    fn normalization_rebases_to_first_joined_date() {
        // SPOT has an earlier bar that does not survive the join; the base
        // must come from 2024-01-02, the first shared date.
        let a = series("SPOT", &[("2024-01-01", 80.0), ("2024-01-02", 100.0)]);
        let b = series("SIRI", &[("2024-01-02", 50.0), ("2024-01-03", 55.0)]);

        let (table, _) = compare(&a, &b).unwrap();
        assert_eq!(table.rows.len(), 1);
        close_to(table.rows[0].norm_a, 100.0);
        close_to(table.rows[0].norm_b, 100.0);
    }

    #[test]
    fn disjoint_dates_fail_with_empty_overlap() {
        let a = series("SPOT", &[("2024-01-01", 100.0)]);
        let b = series("SIRI", &[("2024-02-01", 50.0)]);

        match compare(&a, &b) {
            Err(ComparisonError::EmptyOverlap(x, y)) => {
                assert_eq!(x, "SPOT");
                assert_eq!(y, "SIRI");
            }
            other => panic!("expected EmptyOverlap, got {other:?}"),
        }
    }

    #[test]
    fn reference_scenario_metrics() {
        // A closes [100, 110, 121], B closes [50, 55, 49.5] on shared dates:
        // norm_A = [100, 110, 121], norm_B = [100, 110, 99]
        // ret_A  = [10%, 10%],      ret_B  = [10%, -10%]
        let a = series(
            "SPOT",
            &[
                ("2024-01-01", 100.0),
                ("2024-01-02", 110.0),
                ("2024-01-03", 121.0),
            ],
        );
        let b = series(
            "SIRI",
            &[
                ("2024-01-01", 50.0),
                ("2024-01-02", 55.0),
                ("2024-01-03", 49.5),
            ],
        );

        let (table, metrics) = compare(&a, &b).unwrap();

        let norms_a: Vec<f64> = table.rows.iter().map(|r| r.norm_a).collect();
        let norms_b: Vec<f64> = table.rows.iter().map(|r| r.norm_b).collect();
        for (got, want) in norms_a.iter().zip([100.0, 110.0, 121.0]) {
            close_to(*got, want);
        }
        for (got, want) in norms_b.iter().zip([100.0, 110.0, 99.0]) {
            close_to(*got, want);
        }

        close_to(metrics.total_return_a, 21.0);
        close_to(metrics.total_return_b, -1.0);

        // returns [0.1, 0.1] vs [0.1, -0.1]: A has zero variance
        assert!(metrics.correlation.is_none());
        close_to(metrics.volatility_a.unwrap(), 0.0);
        assert!(metrics.volatility_b.unwrap() > 0.0);
    }

    #[test]
    fn opposite_movers_correlate_negatively() {
        let a = series(
            "SPOT",
            &[
                ("2024-01-01", 100.0),
                ("2024-01-02", 110.0),
                ("2024-01-03", 99.0),
                ("2024-01-04", 108.9),
            ],
        );
        let b = series(
            "SIRI",
            &[
                ("2024-01-01", 50.0),
                ("2024-01-02", 45.0),
                ("2024-01-03", 49.5),
                ("2024-01-04", 44.55),
            ],
        );

        let (_, metrics) = compare(&a, &b).unwrap();
        close_to(metrics.correlation.unwrap(), -1.0);
    }

    #[test]
    fn single_overlapping_row_yields_no_return_metrics() {
        let a = series("SPOT", &[("2024-01-01", 100.0)]);
        let b = series("SIRI", &[("2024-01-01", 50.0)]);

        let (table, metrics) = compare(&a, &b).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(metrics.correlation.is_none());
        assert!(metrics.volatility_a.is_none());
        close_to(metrics.total_return_a, 0.0);
    }
}
