//! Presentation layer: chart outputs to drawable SVG and lookup text.
//!
//! Per-interaction errors stop here. A failed chart becomes a placeholder
//! carrying the reason and a failed lookup becomes a sentence, so one bad
//! panel never takes down the page.

use crate::adapters::chart_svg;
use crate::domain::chart::ChartSpec;
use crate::domain::error::DashboardError;
use crate::domain::interaction::{ChartPanel, LookupOutcome};
use crate::domain::query::{CorrelationMatrix, Lookup};

pub const CORRELATION_TITLE: &str = "Correlation Heatmap";
pub const FORECAST_TITLE: &str = "Actual vs Forecast";

/// A chart ready for embedding in a page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub id: &'static str,
    pub title: String,
    pub svg: String,
}

impl RenderedChart {
    fn from_spec(id: &'static str, spec: &ChartSpec) -> Self {
        Self {
            id,
            title: spec.title.clone(),
            svg: chart_svg::render_chart(spec),
        }
    }

    fn placeholder(id: &'static str, title: &str, err: &DashboardError) -> Self {
        Self {
            id,
            title: title.to_string(),
            svg: chart_svg::render_placeholder(title, &chart_error_message(err)),
        }
    }
}

/// Renders the six charts in page order.
pub fn render_panel(panel: &ChartPanel) -> Vec<RenderedChart> {
    vec![
        RenderedChart::from_spec("price-chart", &panel.price),
        RenderedChart::from_spec("volume-chart", &panel.volume),
        RenderedChart::from_spec("volatility-chart", &panel.volatility),
        RenderedChart::from_spec("daily-return-histogram", &panel.histogram),
        render_correlation(&panel.correlation),
        match &panel.forecast {
            Ok(spec) => RenderedChart::from_spec("forecast-chart", spec),
            Err(e) => RenderedChart::placeholder("forecast-chart", FORECAST_TITLE, e),
        },
    ]
}

fn render_correlation(result: &Result<CorrelationMatrix, DashboardError>) -> RenderedChart {
    match result {
        Ok(matrix) => RenderedChart {
            id: "correlation-heatmap",
            title: CORRELATION_TITLE.to_string(),
            svg: chart_svg::render_heatmap(CORRELATION_TITLE, matrix),
        },
        Err(e) => RenderedChart::placeholder("correlation-heatmap", CORRELATION_TITLE, e),
    }
}

fn chart_error_message(err: &DashboardError) -> String {
    match err {
        DashboardError::InsufficientData { rows, minimum } => format!(
            "Not enough complete rows in this range ({rows} of {minimum} needed)."
        ),
        DashboardError::Prediction { reason } => format!("Forecast unavailable: {reason}"),
        other => other.to_string(),
    }
}

/// `"On {date}: Actual Close Price = {actual}, Predicted Close Price = {predicted}"`.
///
/// Numbers use the shortest round-trip form and always carry a decimal
/// point, so `102` prints as `102.0`.
pub fn format_lookup(lookup: &Lookup) -> String {
    format!(
        "On {}: Actual Close Price = {:?}, Predicted Close Price = {:?}",
        lookup.date.format("%Y-%m-%d"),
        lookup.actual,
        lookup.predicted
    )
}

pub fn lookup_text(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::NoDateSelected => "Please select a date.".to_string(),
        LookupOutcome::Found(lookup) => format_lookup(lookup),
        LookupOutcome::Failed(DashboardError::NotFound { .. }) => {
            "No data available for this date.".to_string()
        }
        LookupOutcome::Failed(e) => format!("Prediction unavailable: {e}"),
    }
}
