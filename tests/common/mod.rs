#![allow(dead_code)]

use chrono::NaiveDate;
use stockcast::domain::error::DashboardError;
use stockcast::domain::forecast::ForecastRow;
pub use stockcast::domain::stock_record::StockRecord;
use stockcast::domain::store::StockStore;
use stockcast::ports::data_port::StockDataPort;
use stockcast::ports::forecast_port::ForecastPort;

pub const PROCESSED_HEADER: &str =
    "Date,Open,High,Low,Close,Volume,SMA_10,SMA_30,EMA_10,EMA_30,Daily_Return,Volatility";

pub struct MockDataPort {
    pub records: Vec<StockRecord>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(records: Vec<StockRecord>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl StockDataPort for MockDataPort {
    fn load(&self) -> Result<Vec<StockRecord>, DashboardError> {
        match &self.error {
            Some(reason) => Err(DashboardError::data_load("mock", reason.clone())),
            None => Ok(self.records.clone()),
        }
    }

    fn source(&self) -> String {
        "mock".to_string()
    }
}

/// Predicts SMA_10 plus a constant offset; fails on rows without SMA_10.
pub struct MockForecastPort {
    pub offset: f64,
}

impl ForecastPort for MockForecastPort {
    fn predict(&self, rows: &[ForecastRow]) -> Result<Vec<f64>, DashboardError> {
        rows.iter()
            .map(|r| {
                r.sma_10
                    .map(|v| v + self.offset)
                    .ok_or_else(|| DashboardError::prediction(format!("row {} lacks SMA_10", r.ds)))
            })
            .collect()
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A fully populated record whose indicators sit close to `close`.
pub fn make_record(date: NaiveDate, close: f64, daily_return: f64) -> StockRecord {
    StockRecord {
        sma_10: Some(close - 1.0),
        sma_30: Some(close - 2.0),
        ema_10: Some(close - 0.5),
        ema_30: Some(close - 1.5),
        daily_return: Some(daily_return),
        volatility: Some(0.01 + daily_return.abs()),
        ..StockRecord::raw(date, close - 1.0, close + 1.0, close - 2.0, close, 1_000)
    }
}

/// 2024-01-01 through 2024-01-05 with closes 100, 102, 101, 105, 107.
pub fn five_day_records() -> Vec<StockRecord> {
    let closes = [100.0, 102.0, 101.0, 105.0, 107.0];
    let mut prev: Option<f64> = None;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let ret = prev.map(|p| close / p - 1.0).unwrap_or(0.0);
            prev = Some(close);
            StockRecord {
                volume: 1_000 * (i as u64 + 1),
                ..make_record(date(2024, 1, i as u32 + 1), close, ret)
            }
        })
        .collect()
}

pub fn five_day_store() -> StockStore {
    StockStore::new("fixture", five_day_records()).unwrap()
}

pub fn generate_records(start: NaiveDate, count: usize, start_price: f64) -> Vec<StockRecord> {
    (0..count)
        .map(|i| {
            let close = start_price + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
            StockRecord {
                volume: 1_000 + (i as u64 * 37) % 500,
                ..make_record(start + chrono::Duration::days(i as i64), close, (i as f64).cos() / 100.0)
            }
        })
        .collect()
}

/// Renders records in the processed CSV schema.
pub fn processed_csv(records: &[StockRecord]) -> String {
    let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    let mut out = String::from(PROCESSED_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            r.date,
            r.open,
            r.high,
            r.low,
            r.close,
            r.volume,
            opt(r.sma_10),
            opt(r.sma_30),
            opt(r.ema_10),
            opt(r.ema_30),
            opt(r.daily_return),
            opt(r.volatility)
        ));
    }
    out
}
