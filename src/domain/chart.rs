//! Chart specifications: the data contract between queries and rendering.

use chrono::NaiveDate;
use std::fmt;

/// A point on the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XValue {
    Date(NaiveDate),
    Number(f64),
}

impl XValue {
    /// Position on a continuous axis. Dates map to day numbers.
    pub fn position(&self) -> f64 {
        match self {
            XValue::Date(d) => {
                use chrono::Datelike;
                d.num_days_from_ce() as f64
            }
            XValue::Number(n) => *n,
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            XValue::Number(n) => write!(f, "{:.4}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    pub x: Vec<XValue>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, kind: SeriesKind) -> Self {
        Self {
            label: label.into(),
            kind,
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    pub fn push(&mut self, x: XValue, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn new(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn series_named(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}
