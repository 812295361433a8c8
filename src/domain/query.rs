//! Query engine: date filtering and the derived series behind each chart.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::chart::{ChartSpec, Series, SeriesKind, XValue};
use crate::domain::date_range::DateRange;
use crate::domain::error::DashboardError;
use crate::domain::forecast::ForecastRow;
use crate::domain::indicator::IndicatorSelection;
use crate::domain::stats;
use crate::domain::stock_record::StockRecord;
use crate::domain::store::StockStore;
use crate::ports::forecast_port::ForecastPort;

pub const DEFAULT_BUCKET_COUNT: usize = 50;
pub const MIN_CORRELATION_ROWS: usize = 2;

/// Records with `start <= date <= end`, in store order.
pub fn filter_range<'a>(store: &'a StockStore, range: &DateRange) -> &'a [StockRecord] {
    store.range(range)
}

pub fn build_price_series(records: &[StockRecord], indicators: &IndicatorSelection) -> ChartSpec {
    let mut close = Series::new("Close Price", SeriesKind::Line);
    for r in records {
        close.push(XValue::Date(r.date), r.close);
    }

    let mut chart = ChartSpec::new("Price Chart with SMA/EMA", "Date", "Price").with_series(close);

    for indicator in indicators.iter() {
        let mut series = Series::new(indicator.column(), SeriesKind::Line);
        for r in records {
            if let Some(v) = r.indicator(indicator) {
                series.push(XValue::Date(r.date), v);
            }
        }
        chart = chart.with_series(series);
    }

    chart
}

pub fn build_volume_series(records: &[StockRecord]) -> ChartSpec {
    let mut series = Series::new("Volume", SeriesKind::Bar);
    for r in records {
        series.push(XValue::Date(r.date), r.volume as f64);
    }
    ChartSpec::new("Volume Chart", "Date", "Volume").with_series(series)
}

pub fn build_volatility_series(records: &[StockRecord]) -> ChartSpec {
    let mut series = Series::new("Volatility", SeriesKind::Line);
    for r in records {
        if let Some(v) = r.volatility {
            series.push(XValue::Date(r.date), v);
        }
    }
    ChartSpec::new("Volatility Chart", "Date", "Volatility").with_series(series)
}

pub fn build_return_histogram(records: &[StockRecord], bucket_count: usize) -> ChartSpec {
    let returns: Vec<f64> = records.iter().filter_map(|r| r.daily_return).collect();
    let hist = stats::histogram(&returns, bucket_count);

    let mut series = Series::new("Daily Return", SeriesKind::Bar);
    for (center, count) in hist.centers.iter().zip(&hist.counts) {
        series.push(XValue::Number(*center), *count as f64);
    }
    ChartSpec::new("Daily Return Histogram", "Daily Return", "Frequency").with_series(series)
}

/// Columns available to the correlation heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationColumn {
    Close,
    Volume,
    Sma10,
    Sma30,
    Ema10,
    Ema30,
    DailyReturn,
    Volatility,
}

impl CorrelationColumn {
    pub const ALL: [CorrelationColumn; 8] = [
        CorrelationColumn::Close,
        CorrelationColumn::Volume,
        CorrelationColumn::Sma10,
        CorrelationColumn::Sma30,
        CorrelationColumn::Ema10,
        CorrelationColumn::Ema30,
        CorrelationColumn::DailyReturn,
        CorrelationColumn::Volatility,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CorrelationColumn::Close => "Close",
            CorrelationColumn::Volume => "Volume",
            CorrelationColumn::Sma10 => "SMA_10",
            CorrelationColumn::Sma30 => "SMA_30",
            CorrelationColumn::Ema10 => "EMA_10",
            CorrelationColumn::Ema30 => "EMA_30",
            CorrelationColumn::DailyReturn => "Daily_Return",
            CorrelationColumn::Volatility => "Volatility",
        }
    }

    fn value(self, r: &StockRecord) -> Option<f64> {
        match self {
            CorrelationColumn::Close => Some(r.close),
            CorrelationColumn::Volume => Some(r.volume as f64),
            CorrelationColumn::Sma10 => r.sma_10,
            CorrelationColumn::Sma30 => r.sma_30,
            CorrelationColumn::Ema10 => r.ema_10,
            CorrelationColumn::Ema30 => r.ema_30,
            CorrelationColumn::DailyReturn => r.daily_return,
            CorrelationColumn::Volatility => r.volatility,
        }
    }
}

impl fmt::Display for CorrelationColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Symmetric matrix of pairwise Pearson coefficients. Entries involving a
/// zero-variance column are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<CorrelationColumn>,
    pub values: Vec<Vec<f64>>,
    /// Number of complete rows the coefficients were computed over.
    pub rows: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

pub fn build_correlation_matrix(
    records: &[StockRecord],
    columns: &[CorrelationColumn],
) -> Result<CorrelationMatrix, DashboardError> {
    let rows: Vec<Vec<f64>> = records
        .iter()
        .filter_map(|r| columns.iter().map(|c| c.value(r)).collect::<Option<Vec<f64>>>())
        .collect();

    if rows.len() < MIN_CORRELATION_ROWS {
        return Err(DashboardError::InsufficientData {
            rows: rows.len(),
            minimum: MIN_CORRELATION_ROWS,
        });
    }

    let by_column: Vec<Vec<f64>> = (0..columns.len())
        .map(|j| rows.iter().map(|row| row[j]).collect())
        .collect();

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = stats::pearson(&by_column[i], &by_column[j]).unwrap_or(f64::NAN);
            let r = if i == j && r.is_finite() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
        rows: rows.len(),
    })
}

/// Predicts each record's close from that same record's indicators and
/// pairs the predictions with the actual closes.
pub fn build_forecast_series(
    records: &[StockRecord],
    oracle: &dyn ForecastPort,
) -> Result<ChartSpec, DashboardError> {
    let rows: Vec<ForecastRow> = records.iter().map(ForecastRow::from_record).collect();
    let predictions = if rows.is_empty() {
        Vec::new()
    } else {
        oracle.predict(&rows)?
    };

    if predictions.len() != rows.len() {
        return Err(DashboardError::prediction(format!(
            "model returned {} predictions for {} rows",
            predictions.len(),
            rows.len()
        )));
    }

    let mut actual = Series::new("Actual", SeriesKind::Line);
    let mut predicted = Series::new(format!("{} Forecast", oracle.name()), SeriesKind::Line);
    for (r, yhat) in records.iter().zip(predictions) {
        actual.push(XValue::Date(r.date), r.close);
        predicted.push(XValue::Date(r.date), yhat);
    }

    Ok(ChartSpec::new(
        format!("Actual vs {} Forecast", oracle.name()),
        "Date",
        "Price",
    )
    .with_series(actual)
    .with_series(predicted))
}

/// Actual and predicted close for one trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// Exact-date lookup; dates without a record (weekends, holidays, out of
/// range) are `NotFound`.
pub fn lookup_single_date(
    store: &StockStore,
    oracle: &dyn ForecastPort,
    date: NaiveDate,
) -> Result<Lookup, DashboardError> {
    let record = store.get(date).ok_or(DashboardError::NotFound { date })?;
    let row = ForecastRow::from_record(record);
    let predicted = oracle
        .predict(std::slice::from_ref(&row))?
        .first()
        .copied()
        .ok_or_else(|| DashboardError::prediction("model returned no prediction"))?;

    Ok(Lookup {
        date,
        actual: record.close,
        predicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::Indicator;
    use approx::assert_abs_diff_eq;

    struct EchoSma10;

    impl ForecastPort for EchoSma10 {
        fn predict(&self, rows: &[ForecastRow]) -> Result<Vec<f64>, DashboardError> {
            rows.iter()
                .map(|r| {
                    r.sma_10
                        .ok_or_else(|| DashboardError::prediction(format!("{} lacks SMA_10", r.ds)))
                })
                .collect()
        }

        fn name(&self) -> &str {
            "Echo"
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn record(day: u32, close: f64) -> StockRecord {
        StockRecord {
            sma_10: Some(close - 1.0),
            sma_30: Some(close - 2.0),
            ema_10: Some(close - 0.5),
            ema_30: Some(close - 1.5),
            daily_return: Some(day as f64 * 0.01),
            volatility: Some(0.1 + (day % 3) as f64 * 0.05),
            ..StockRecord::raw(d(day), close, close + 1.0, close - 1.0, close, 1_000 * day as u64)
        }
    }

    fn store(closes: &[f64]) -> StockStore {
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| record(i as u32 + 1, c))
            .collect();
        StockStore::new("test", records).unwrap()
    }

    #[test]
    fn price_series_always_has_close() {
        let s = store(&[100.0, 102.0]);
        let chart = build_price_series(s.records(), &IndicatorSelection::empty());
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, "Close Price");
        assert_eq!(chart.series[0].y, vec![100.0, 102.0]);
    }

    #[test]
    fn price_series_skips_undefined_indicator_points() {
        let mut records = store(&[100.0, 102.0, 101.0]).records().to_vec();
        records[0].sma_30 = None;
        let chart = build_price_series(
            &records,
            &IndicatorSelection::new([Indicator::Sma30, Indicator::Ema10]),
        );
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series_named("SMA_30").unwrap().len(), 2);
        assert_eq!(chart.series_named("EMA_10").unwrap().len(), 3);
    }

    #[test]
    fn volatility_series_skips_undefined() {
        let mut records = store(&[100.0, 102.0, 101.0]).records().to_vec();
        records[1].volatility = None;
        let chart = build_volatility_series(&records);
        assert_eq!(chart.series[0].len(), 2);
    }

    #[test]
    fn volume_series_one_bar_per_record() {
        let s = store(&[100.0, 102.0, 101.0]);
        let chart = build_volume_series(s.records());
        assert_eq!(chart.series[0].kind, SeriesKind::Bar);
        assert_eq!(chart.series[0].y, vec![1_000.0, 2_000.0, 3_000.0]);
    }

    #[test]
    fn histogram_excludes_undefined_returns() {
        let mut records = store(&[100.0, 102.0, 101.0, 99.0]).records().to_vec();
        records[0].daily_return = None;
        let chart = build_return_histogram(&records, 10);
        let total: f64 = chart.series[0].y.iter().sum();
        assert_eq!(total, 3.0);
    }

    #[test]
    fn correlation_needs_two_complete_rows() {
        let mut records = store(&[100.0, 102.0]).records().to_vec();
        records[1].volatility = None;
        let err = build_correlation_matrix(&records, &CorrelationColumn::ALL).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InsufficientData { rows: 1, minimum: 2 }
        ));
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let s = store(&[100.0, 102.0, 101.0, 105.0, 107.0, 104.0]);
        let m = build_correlation_matrix(s.records(), &CorrelationColumn::ALL).unwrap();
        assert_eq!(m.size(), 8);
        assert_eq!(m.rows, 6);
        for i in 0..m.size() {
            assert_abs_diff_eq!(m.get(i, i), 1.0, epsilon = 1e-12);
            for j in 0..m.size() {
                assert_eq!(m.get(i, j).to_bits(), m.get(j, i).to_bits());
            }
        }
        // close and sma_10 differ by a constant
        assert_abs_diff_eq!(m.get(0, 2), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn correlation_zero_variance_column_is_nan() {
        let mut records = store(&[100.0, 102.0, 101.0]).records().to_vec();
        for r in &mut records {
            r.volume = 500;
        }
        let m = build_correlation_matrix(&records, &CorrelationColumn::ALL).unwrap();
        assert!(m.get(1, 1).is_nan());
        assert!(m.get(0, 1).is_nan());
        assert_abs_diff_eq!(m.get(0, 0), 1.0);
    }

    #[test]
    fn forecast_series_aligns_actual_and_predicted() {
        let s = store(&[100.0, 102.0, 101.0]);
        let chart = build_forecast_series(s.records(), &EchoSma10).unwrap();
        assert_eq!(chart.title, "Actual vs Echo Forecast");
        let actual = chart.series_named("Actual").unwrap();
        let predicted = chart.series_named("Echo Forecast").unwrap();
        assert_eq!(actual.x, predicted.x);
        assert_eq!(actual.y, vec![100.0, 102.0, 101.0]);
        assert_eq!(predicted.y, vec![99.0, 101.0, 100.0]);
    }

    #[test]
    fn forecast_series_surfaces_prediction_error() {
        let mut records = store(&[100.0, 102.0]).records().to_vec();
        records[1].sma_10 = None;
        let err = build_forecast_series(&records, &EchoSma10).unwrap_err();
        assert!(matches!(err, DashboardError::Prediction { .. }));
    }

    #[test]
    fn forecast_series_empty_range_skips_model() {
        let chart = build_forecast_series(&[], &EchoSma10).unwrap();
        assert!(chart.is_empty());
    }

    #[test]
    fn lookup_returns_actual_and_predicted() {
        let s = store(&[100.0, 102.0, 101.0]);
        let lookup = lookup_single_date(&s, &EchoSma10, d(2)).unwrap();
        assert_eq!(lookup.actual, 102.0);
        assert_eq!(lookup.predicted, 101.0);
    }

    #[test]
    fn lookup_missing_date_is_not_found() {
        let s = store(&[100.0, 102.0]);
        let err = lookup_single_date(&s, &EchoSma10, d(9)).unwrap_err();
        assert!(matches!(err, DashboardError::NotFound { .. }));
    }
}
