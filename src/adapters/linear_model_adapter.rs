//! Pre-fitted additive regression model.
//!
//! The artifact is an INI file:
//!
//! ```ini
//! [model]
//! name = Prophet
//! intercept = 12.5
//! origin = 2023-08-01
//! trend_per_day = 0.05
//!
//! [regressors]
//! volume = 0.0
//! sma_10 = 0.6
//! ```
//!
//! `yhat = intercept + trend_per_day * days(ds - origin) + sum(coef * feature)`.
//! Only regressors listed under `[regressors]` are required in each row.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::DashboardError;
use crate::domain::forecast::{Feature, ForecastRow};
use crate::ports::config_port::ConfigPort;
use crate::ports::forecast_port::ForecastPort;

const DEFAULT_NAME: &str = "Model";

#[derive(Debug, Clone, PartialEq)]
pub struct LinearForecastModel {
    name: String,
    intercept: f64,
    origin: NaiveDate,
    trend_per_day: f64,
    coefficients: BTreeMap<Feature, f64>,
}

impl LinearForecastModel {
    pub fn new(name: impl Into<String>, intercept: f64, origin: NaiveDate, trend_per_day: f64) -> Self {
        Self {
            name: name.into(),
            intercept,
            origin,
            trend_per_day,
            coefficients: BTreeMap::new(),
        }
    }

    pub fn with_coefficient(mut self, feature: Feature, coefficient: f64) -> Self {
        self.coefficients.insert(feature, coefficient);
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let config = FileConfigAdapter::from_file(path).map_err(|e| DashboardError::ModelLoad {
            path: source.clone(),
            reason: e.to_string(),
        })?;
        let model = Self::from_config(&config, &source)?;
        tracing::info!(
            path = %source,
            name = %model.name,
            regressors = model.coefficients.len(),
            "loaded forecast model"
        );
        Ok(model)
    }

    /// Reads `[model]` and `[regressors]` from an already parsed artifact.
    /// `source` names the artifact in error messages.
    pub fn from_config(config: &dyn ConfigPort, source: &str) -> Result<Self, DashboardError> {
        let fail = |reason: String| DashboardError::ModelLoad {
            path: source.to_string(),
            reason,
        };
        let number = |section: &str, key: &str| -> Result<Option<f64>, DashboardError> {
            match config.get_string(section, key) {
                None => Ok(None),
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| fail(format!("[{section}] {key} is not a number: {raw:?}"))),
            }
        };

        let name = config
            .get_string("model", "name")
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let intercept =
            number("model", "intercept")?.ok_or_else(|| fail("missing [model] intercept".into()))?;
        let trend_per_day = number("model", "trend_per_day")?.unwrap_or(0.0);
        let origin = match config.get_string("model", "origin") {
            None => return Err(fail("missing [model] origin".into())),
            Some(_) => config
                .get_date("model", "origin")
                .ok_or_else(|| fail("[model] origin must be YYYY-MM-DD".into()))?,
        };

        let mut model = Self::new(name, intercept, origin, trend_per_day);
        for key in config.keys("regressors") {
            let feature = Feature::from_column(&key)
                .ok_or_else(|| fail(format!("unknown regressor {key:?}")))?;
            let coefficient = number("regressors", &key)?
                .ok_or_else(|| fail(format!("regressor {key} has no coefficient")))?;
            model.coefficients.insert(feature, coefficient);
        }
        Ok(model)
    }

    pub fn regressors(&self) -> impl Iterator<Item = Feature> + '_ {
        self.coefficients.keys().copied()
    }

    fn predict_row(&self, row: &ForecastRow) -> Result<f64, DashboardError> {
        let days = (row.ds - self.origin).num_days() as f64;
        let mut yhat = self.intercept + self.trend_per_day * days;
        for (&feature, &coefficient) in &self.coefficients {
            let value = row.feature(feature).ok_or_else(|| {
                DashboardError::prediction(format!("row {} lacks {}", row.ds, feature))
            })?;
            yhat += coefficient * value;
        }
        Ok(yhat)
    }
}

impl ForecastPort for LinearForecastModel {
    fn predict(&self, rows: &[ForecastRow]) -> Result<Vec<f64>, DashboardError> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
