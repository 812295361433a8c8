//! Derives the indicator columns from raw daily OHLCV records.

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_rolling_stddev;
use crate::domain::stock_record::StockRecord;

pub const SHORT_WINDOW: usize = 10;
pub const LONG_WINDOW: usize = 30;
pub const VOLATILITY_WINDOW: usize = 30;

/// `close[i] / close[i-1] - 1`; undefined for the first record.
pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)));
    out
}

/// Fills every derived column. Records must already be in date order.
///
/// With `keep_warmup` false, rows whose derived values are not all defined
/// (the first thirty or so) are dropped.
pub fn derive_indicators(raw: &[StockRecord], keep_warmup: bool) -> Vec<StockRecord> {
    let closes: Vec<f64> = raw.iter().map(|r| r.close).collect();
    let sma_10 = calculate_sma(&closes, SHORT_WINDOW);
    let sma_30 = calculate_sma(&closes, LONG_WINDOW);
    let ema_10 = calculate_ema(&closes, SHORT_WINDOW);
    let ema_30 = calculate_ema(&closes, LONG_WINDOW);
    let returns = daily_returns(&closes);
    let volatility = calculate_rolling_stddev(&returns, VOLATILITY_WINDOW);

    let derived = raw.iter().enumerate().map(|(i, r)| StockRecord {
        sma_10: sma_10[i],
        sma_30: sma_30[i],
        ema_10: ema_10[i],
        ema_30: ema_30[i],
        daily_return: returns[i],
        volatility: volatility[i],
        ..r.clone()
    });

    if keep_warmup {
        derived.collect()
    } else {
        derived.filter(StockRecord::is_complete).collect()
    }
}
