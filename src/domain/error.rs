//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for stockcast.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("failed to load stock data from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("failed to load forecast model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("prediction failed: {reason}")]
    Prediction { reason: String },

    #[error("insufficient data: have {rows} complete rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("no data available for {date}")]
    NotFound { date: NaiveDate },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn data_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn prediction(reason: impl Into<String>) -> Self {
        Self::Prediction {
            reason: reason.into(),
        }
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. } | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::DataLoad { .. } => 3,
            DashboardError::ModelLoad { .. } | DashboardError::Prediction { .. } => 4,
            DashboardError::InsufficientData { .. }
            | DashboardError::NotFound { .. }
            | DashboardError::InvalidRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
