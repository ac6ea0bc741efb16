use std::path::Path;

use anyhow::{Context, Result};
use chrono::Duration;
use plotters::prelude::*;
use tracing::info;

use crate::models::ComparisonTable;

/// Render both normalized series as a line chart over the joined date axis.
/// Purely a side effect; callers only consume success or failure.
pub fn render_normalized_chart(table: &ComparisonTable, out_path: &Path) -> Result<()> {
    let rows = &table.rows;
    let first = rows.first().context("comparison table has no rows")?;
    let last = rows.last().context("comparison table has no rows")?;

    // Pad degenerate ranges so a single-row table still renders
    let (x_start, x_end) = if first.date == last.date {
        (first.date - Duration::days(1), last.date + Duration::days(1))
    } else {
        (first.date, last.date)
    };

    let (mut y_min, mut y_max) = rows.iter().fold((f64::MAX, f64::MIN), |(lo, hi), r| {
        (
            lo.min(r.norm_a).min(r.norm_b),
            hi.max(r.norm_a).max(r.norm_b),
        )
    });
    let pad = ((y_max - y_min) * 0.05).max(1.0);
    y_min -= pad;
    y_max += pad;

    let root = SVGBackend::new(out_path, (1280, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Normalized price performance: {} vs {}",
                table.ticker_a, table.ticker_b
            ),
            ("sans-serif", 28),
        )
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(x_start..x_end, y_min..y_max)?;

    chart
        .configure_mesh()
        .y_desc("Normalized close (base = 100)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.date, r.norm_a)),
            &BLUE,
        ))?
        .label(table.ticker_a.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.date, r.norm_b)),
            &RED,
        ))?
        .label(table.ticker_b.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    info!("wrote comparison chart to {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComparisonRow;
    use chrono::NaiveDate;

    fn row(day: u32, norm_a: f64, norm_b: f64) -> ComparisonRow {
        ComparisonRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close_a: norm_a,
            close_b: norm_b,
            norm_a,
            norm_b,
        }
    }

    #[test]
    fn renders_svg_artifact() {
        let table = ComparisonTable {
            ticker_a: "SPOT".into(),
            ticker_b: "SIRI".into(),
            rows: vec![row(1, 100.0, 100.0), row(2, 110.0, 95.0), row(3, 121.0, 99.0)],
        };
        let dir =
            std::env::temp_dir().join(format!("stockcompare-chart-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("spot_vs_siri_performance.svg");

        render_normalized_chart(&table, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml") || content.starts_with("<svg"));
        assert!(content.contains("<polyline") || content.contains("<path"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn single_row_table_still_renders() {
        let table = ComparisonTable {
            ticker_a: "SPOT".into(),
            ticker_b: "SIRI".into(),
            rows: vec![row(1, 100.0, 100.0)],
        };
        let dir =
            std::env::temp_dir().join(format!("stockcompare-chart1-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("chart.svg");

        render_normalized_chart(&table, &path).unwrap();
        assert!(path.exists());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = ComparisonTable {
            ticker_a: "SPOT".into(),
            ticker_b: "SIRI".into(),
            rows: vec![],
        };
        let path = std::env::temp_dir().join("stockcompare-never-written.svg");

        assert!(render_normalized_chart(&table, &path).is_err());
    }
}
