//! Stock data source port trait.

use crate::domain::error::DashboardError;
use crate::domain::stock_record::StockRecord;

/// Source of the processed daily records, read once at startup.
pub trait StockDataPort {
    fn load(&self) -> Result<Vec<StockRecord>, DashboardError>;

    /// Description of the source for log lines and error messages.
    fn source(&self) -> String;
}
