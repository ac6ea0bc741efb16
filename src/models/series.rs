use crate::models::PricePoint;

/// Daily price history for a single ticker, ascending by date with no
/// duplicate dates. Built once per fetch and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    ticker: String,
    rows: Vec<PricePoint>,
}

impl SeriesTable {
    /// Build a table from unordered rows: sorts ascending by date and drops
    /// duplicate dates (the later entry wins).
    pub fn from_rows(ticker: impl Into<String>, mut rows: Vec<PricePoint>) -> Self {
        rows.sort_by_key(|p| p.date);
        rows.dedup_by(|b, a| {
            // dedup_by sees (next, kept); overwrite kept so the later row wins
            if a.date == b.date {
                std::mem::swap(a, b);
                true
            } else {
                false
            }
        });
        Self {
            ticker: ticker.into(),
            rows,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn rows(&self) -> &[PricePoint] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
