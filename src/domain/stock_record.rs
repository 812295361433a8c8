//! Daily stock record with materialized indicator columns.

use chrono::NaiveDate;

use crate::domain::indicator::Indicator;

/// One trading day. Derived columns are `None` during their warm-up window.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub sma_10: Option<f64>,
    pub sma_30: Option<f64>,
    pub ema_10: Option<f64>,
    pub ema_30: Option<f64>,
    pub daily_return: Option<f64>,
    pub volatility: Option<f64>,
}

impl StockRecord {
    /// Record with only raw OHLCV fields populated.
    pub fn raw(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            sma_10: None,
            sma_30: None,
            ema_10: None,
            ema_30: None,
            daily_return: None,
            volatility: None,
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Sma10 => self.sma_10,
            Indicator::Sma30 => self.sma_30,
            Indicator::Ema10 => self.ema_10,
            Indicator::Ema30 => self.ema_30,
        }
    }

    /// True when every derived column has a value.
    pub fn is_complete(&self) -> bool {
        self.sma_10.is_some()
            && self.sma_30.is_some()
            && self.ema_10.is_some()
            && self.ema_30.is_some()
            && self.daily_return.is_some()
            && self.volatility.is_some()
    }
}
