mod comparison;
mod price_point;
mod series;

pub use comparison::{ComparisonRow, ComparisonTable, ReportMetrics};
pub use price_point::PricePoint;
pub use series::SeriesTable;
