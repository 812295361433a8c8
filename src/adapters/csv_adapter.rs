//! CSV file data adapter.
//!
//! Reads the processed daily CSV (OHLCV plus indicator columns) and the raw
//! provider OHLCV CSV, and writes the processed schema back out. Columns are
//! located by header name, so column order and extra columns do not matter.

use crate::domain::error::DashboardError;
use crate::domain::stock_record::StockRecord;
use crate::ports::data_port::StockDataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Processed CSV header, in write order.
pub const PROCESSED_COLUMNS: [&str; 12] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "SMA_10",
    "SMA_30",
    "EMA_10",
    "EMA_30",
    "Daily_Return",
    "Volatility",
];

const RAW_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn error(&self, reason: impl Into<String>) -> DashboardError {
        DashboardError::data_load(self.path.display().to_string(), reason)
    }

    fn open(&self) -> Result<csv::Reader<std::fs::File>, DashboardError> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.error(e.to_string()))
    }

    /// Reads a provider OHLCV file. Rows before the first parseable date
    /// (multi-row provider headers such as `Ticker,...`) are skipped.
    pub fn load_raw(&self) -> Result<Vec<StockRecord>, DashboardError> {
        let mut rdr = self.open()?;
        let headers = rdr.headers().map_err(|e| self.error(e.to_string()))?.clone();
        let idx = column_indices(&headers, &RAW_COLUMNS).map_err(|e| self.error(e))?;

        let mut records = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let row = result.map_err(|e| self.error(format!("CSV parse error: {}", e)))?;
            let date_cell = row.get(idx[0]).unwrap_or("");
            let Some(date) = parse_date(date_cell) else {
                if records.is_empty() {
                    continue;
                }
                return Err(self.error(format!("row {}: invalid date {:?}", line + 2, date_cell)));
            };
            records.push(self.parse_ohlcv(&row, &idx, date, line + 2)?);
        }
        Ok(records)
    }

    fn parse_ohlcv(
        &self,
        row: &csv::StringRecord,
        idx: &[usize],
        date: NaiveDate,
        line: usize,
    ) -> Result<StockRecord, DashboardError> {
        let price = |i: usize, name: &str| -> Result<f64, DashboardError> {
            let cell = row.get(idx[i]).unwrap_or("");
            match parse_optional_f64(cell) {
                Some(v) if v > 0.0 => Ok(v),
                Some(v) => Err(self.error(format!("row {line}: {name} must be positive, got {v}"))),
                None => Err(self.error(format!("row {line}: invalid {name} value {cell:?}"))),
            }
        };

        let open = price(1, "Open")?;
        let high = price(2, "High")?;
        let low = price(3, "Low")?;
        let close = price(4, "Close")?;
        let volume_cell = row.get(idx[5]).unwrap_or("");
        let volume = parse_volume(volume_cell)
            .ok_or_else(|| self.error(format!("row {line}: invalid Volume value {volume_cell:?}")))?;

        Ok(StockRecord::raw(date, open, high, low, close, volume))
    }

    /// Writes records with the processed header. Undefined values are empty cells.
    pub fn write_processed(&self, records: &[StockRecord]) -> Result<(), DashboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut wtr = csv::Writer::from_path(&self.path).map_err(|e| self.error(e.to_string()))?;
        wtr.write_record(PROCESSED_COLUMNS)
            .map_err(|e| self.error(e.to_string()))?;

        let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        for r in records {
            wtr.write_record([
                r.date.format("%Y-%m-%d").to_string(),
                r.open.to_string(),
                r.high.to_string(),
                r.low.to_string(),
                r.close.to_string(),
                r.volume.to_string(),
                opt(r.sma_10),
                opt(r.sma_30),
                opt(r.ema_10),
                opt(r.ema_30),
                opt(r.daily_return),
                opt(r.volatility),
            ])
            .map_err(|e| self.error(e.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl StockDataPort for CsvAdapter {
    fn load(&self) -> Result<Vec<StockRecord>, DashboardError> {
        let mut rdr = self.open()?;
        let headers = rdr.headers().map_err(|e| self.error(e.to_string()))?.clone();
        let idx = column_indices(&headers, &PROCESSED_COLUMNS).map_err(|e| self.error(e))?;

        let mut records = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let line = line + 2;
            let row = result.map_err(|e| self.error(format!("CSV parse error: {}", e)))?;

            let date_cell = row.get(idx[0]).unwrap_or("");
            let date = parse_date(date_cell)
                .ok_or_else(|| self.error(format!("row {line}: invalid date {date_cell:?}")))?;

            let derived = |i: usize| -> Result<Option<f64>, DashboardError> {
                let cell = row.get(idx[i]).unwrap_or("");
                if is_missing(cell) {
                    return Ok(None);
                }
                parse_optional_f64(cell).map(Some).ok_or_else(|| {
                    self.error(format!(
                        "row {line}: invalid {} value {cell:?}",
                        PROCESSED_COLUMNS[i]
                    ))
                })
            };

            let record = StockRecord {
                sma_10: derived(6)?,
                sma_30: derived(7)?,
                ema_10: derived(8)?,
                ema_30: derived(9)?,
                daily_return: derived(10)?,
                volatility: derived(11)?,
                ..self.parse_ohlcv(&row, &idx, date, line)?
            };
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), rows = records.len(), "read stock csv");
        Ok(records)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

fn column_indices(headers: &csv::StringRecord, wanted: &[&str]) -> Result<Vec<usize>, String> {
    wanted
        .iter()
        .map(|name| {
            let find = |label: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(label));
            find(name)
                // provider downloads label the date column "Price" in the first header row
                .or_else(|| (*name == "Date").then(|| find("Price")).flatten())
                .ok_or_else(|| format!("missing column {}", name))
        })
        .collect()
}

/// `YYYY-MM-DD`, optionally followed by a time component.
/// `YYYY-MM-DD`, optionally followed by a time part after `' '` or `'T'`.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return Some(date);
    }
    match cell.as_bytes().get(10).copied() {
        Some(b' ' | b'T') => cell
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        _ => None,
    }
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

fn parse_optional_f64(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Largest float volume that still converts to an exact integer.
const MAX_EXACT_FLOAT_VOLUME: f64 = 9_007_199_254_740_992.0;

/// Accepts integral floats such as `1200.0`, which pandas writes for volume
/// columns that once held NaN.
fn parse_volume(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<u64>() {
        return Some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    (v.is_finite() && (0.0..=MAX_EXACT_FLOAT_VOLUME).contains(&v) && v.fract() == 0.0)
        .then_some(v as u64)
}
