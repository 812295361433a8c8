//! Forecast model port trait.

use crate::domain::error::DashboardError;
use crate::domain::forecast::ForecastRow;

/// A pre-trained model treated as an opaque predictor.
///
/// Implementations return exactly one prediction per input row, in input
/// order, or a [`DashboardError::Prediction`] when a row lacks a feature the
/// model requires.
pub trait ForecastPort {
    fn predict(&self, rows: &[ForecastRow]) -> Result<Vec<f64>, DashboardError>;

    /// Display name used in chart labels, e.g. "Prophet".
    fn name(&self) -> &str;
}
