//! Inclusive calendar date range.

use chrono::NaiveDate;

use crate::domain::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Smallest range covering both dates, in either order.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Narrows the range to `[min, max]`. A range with no overlap is
    /// returned unchanged so that it still selects nothing.
    pub fn clamp_to(&self, min: NaiveDate, max: NaiveDate) -> Self {
        if self.end < min || self.start > max {
            return *self;
        }
        let start = self.start.clamp(min, max);
        let end = self.end.clamp(min, max);
        Self { start, end }
    }
}
