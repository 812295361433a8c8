//! Feature rows handed to the forecast model.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::stock_record::StockRecord;

/// Regressor columns a model may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Volume,
    Sma10,
    Sma30,
    Ema10,
    Ema30,
    DailyReturn,
    Volatility,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Volume,
        Feature::Sma10,
        Feature::Sma30,
        Feature::Ema10,
        Feature::Ema30,
        Feature::DailyReturn,
        Feature::Volatility,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Feature::Volume => "Volume",
            Feature::Sma10 => "SMA_10",
            Feature::Sma30 => "SMA_30",
            Feature::Ema10 => "EMA_10",
            Feature::Ema30 => "EMA_30",
            Feature::DailyReturn => "Daily_Return",
            Feature::Volatility => "Volatility",
        }
    }

    /// Case-insensitive match on the column name.
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.column().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// `(ds, volume, sma_10, sma_30, ema_10, ema_30, daily_return, volatility)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub ds: NaiveDate,
    pub volume: f64,
    pub sma_10: Option<f64>,
    pub sma_30: Option<f64>,
    pub ema_10: Option<f64>,
    pub ema_30: Option<f64>,
    pub daily_return: Option<f64>,
    pub volatility: Option<f64>,
}

impl ForecastRow {
    /// Uses the record's own same-day indicators, so the resulting
    /// prediction is an in-sample fit of that day's close rather than a
    /// forward-looking forecast.
    pub fn from_record(record: &StockRecord) -> Self {
        Self {
            ds: record.date,
            volume: record.volume as f64,
            sma_10: record.sma_10,
            sma_30: record.sma_30,
            ema_10: record.ema_10,
            ema_30: record.ema_30,
            daily_return: record.daily_return,
            volatility: record.volatility,
        }
    }

    pub fn feature(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Volume => Some(self.volume),
            Feature::Sma10 => self.sma_10,
            Feature::Sma30 => self.sma_30,
            Feature::Ema10 => self.ema_10,
            Feature::Ema30 => self.ema_30,
            Feature::DailyReturn => self.daily_return,
            Feature::Volatility => self.volatility,
        }
    }
}
