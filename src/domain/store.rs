//! Immutable in-memory store of daily records.
//!
//! Built once at startup and shared read-only. Records are kept sorted by
//! date with no duplicates, so bounds are O(1) and lookups binary-search.

use chrono::NaiveDate;

use crate::domain::date_range::DateRange;
use crate::domain::error::DashboardError;
use crate::domain::stock_record::StockRecord;
use crate::ports::data_port::StockDataPort;

#[derive(Debug, Clone)]
pub struct StockStore {
    records: Vec<StockRecord>,
}

impl StockStore {
    /// Sorts `records` by date and rejects empty input or repeated dates.
    /// `source` names the origin in error messages.
    pub fn new(source: &str, mut records: Vec<StockRecord>) -> Result<Self, DashboardError> {
        if records.is_empty() {
            return Err(DashboardError::data_load(source, "no records"));
        }

        records.sort_by_key(|r| r.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DashboardError::data_load(
                source,
                format!("duplicate date {}", pair[0].date),
            ));
        }

        Ok(Self { records })
    }

    pub fn load(port: &dyn StockDataPort) -> Result<Self, DashboardError> {
        let records = port.load()?;
        Self::new(&port.source(), records)
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> NaiveDate {
        self.records[0].date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.records[self.records.len() - 1].date
    }

    /// Entire span of the store.
    pub fn full_range(&self) -> DateRange {
        DateRange::spanning(self.min_date(), self.max_date())
    }

    /// Exact-date lookup.
    pub fn get(&self, date: NaiveDate) -> Option<&StockRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Contiguous slice of records inside `range`.
    pub fn range(&self, range: &DateRange) -> &[StockRecord] {
        let lo = self.records.partition_point(|r| r.date < range.start());
        let hi = self.records.partition_point(|r| r.date <= range.end());
        &self.records[lo..hi]
    }
}
