//! HTTP request handlers for web adapter.
//!
//! Handlers parse query parameters into [`Controls`], hand them to the
//! [`Dashboard`], and render whatever comes back.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::presentation::{self, RenderedChart};
use crate::domain::date_range::DateRange;
use crate::domain::indicator::{Indicator, IndicatorSelection};
use crate::domain::interaction::{Controls, Dashboard};
use crate::domain::route::Page;

use super::templates::{
    AboutTemplate, ChartsTemplate, ForecastingTemplate, LookupTemplate, full_page,
    indicator_options,
};
use super::{AppState, WebError, is_htmx_request};

/// Range and overlay controls as sent by the forecasting form.
///
/// Overlays arrive either as `indicators=SMA_10,EMA_30` or as one checkbox
/// field per column. Checkbox forms carry `submitted` so that a form with
/// every box cleared means "no overlays" rather than "defaults".
#[derive(Debug, Default, Deserialize)]
pub struct ChartsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub indicators: Option<String>,
    #[serde(rename = "SMA_10")]
    pub sma_10: Option<String>,
    #[serde(rename = "SMA_30")]
    pub sma_30: Option<String>,
    #[serde(rename = "EMA_10")]
    pub ema_10: Option<String>,
    #[serde(rename = "EMA_30")]
    pub ema_30: Option<String>,
    pub submitted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub date: Option<String>,
}

fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, WebError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| WebError::bad_request(format!("Invalid {name} date {v:?}, expected YYYY-MM-DD"))),
    }
}

impl ChartsQuery {
    fn selection(&self) -> Result<Option<IndicatorSelection>, WebError> {
        if let Some(list) = &self.indicators {
            return IndicatorSelection::parse_list(list)
                .map(Some)
                .map_err(|e| WebError::bad_request(e.to_string()));
        }
        if self.submitted.is_none() {
            return Ok(None);
        }
        let boxes = [
            (Indicator::Sma10, &self.sma_10),
            (Indicator::Sma30, &self.sma_30),
            (Indicator::Ema10, &self.ema_10),
            (Indicator::Ema30, &self.ema_30),
        ];
        Ok(Some(IndicatorSelection::new(
            boxes
                .into_iter()
                .filter(|(_, value)| value.is_some())
                .map(|(indicator, _)| indicator),
        )))
    }

    /// Applies the query on top of `defaults`. Missing dates keep the
    /// default bounds; `start > end` is rejected.
    fn controls(&self, defaults: Controls) -> Result<Controls, WebError> {
        let start = parse_date_param("start", self.start.as_deref())?
            .unwrap_or(defaults.range.start());
        let end = parse_date_param("end", self.end.as_deref())?.unwrap_or(defaults.range.end());
        let range = DateRange::new(start, end)?;
        let indicators = self.selection()?.unwrap_or(defaults.indicators);
        Ok(Controls {
            range,
            indicators,
            lookup_date: defaults.lookup_date,
        })
    }
}

fn dashboard(state: &AppState) -> Dashboard<'_> {
    Dashboard::new(&state.store, state.oracle.as_ref())
}

/// Runs the range change through the dashboard and renders the six charts.
fn chart_outputs(dash: Dashboard<'_>, controls: Controls) -> (Controls, Vec<RenderedChart>) {
    let range = controls.range;
    let (controls, panel) = dash.set_range(controls, range);
    (controls, presentation::render_panel(&panel))
}

fn respond(
    page: Page,
    state: &AppState,
    headers: &HeaderMap,
    fragment: String,
) -> Result<Response, WebError> {
    if is_htmx_request(headers) {
        Ok(Html(fragment).into_response())
    } else {
        Ok(Html(full_page(page, &state.symbol, &fragment)?).into_response())
    }
}

/// `/`, `/about`, and every unknown path.
pub async fn page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, WebError> {
    match Page::from_path(uri.path()) {
        Page::Forecasting => render_forecasting(&state, &headers, &ChartsQuery::default()),
        Page::About => {
            let fragment = AboutTemplate {
                symbol: &state.symbol,
            }
            .render()?;
            respond(Page::About, &state, &headers, fragment)
        }
    }
}

pub async fn forecasting(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ChartsQuery>,
) -> Result<Response, WebError> {
    render_forecasting(&state, &headers, &query)
}

fn render_forecasting(
    state: &AppState,
    headers: &HeaderMap,
    query: &ChartsQuery,
) -> Result<Response, WebError> {
    let dash = dashboard(state);
    let controls = query.controls(dash.default_controls())?;
    let (controls, charts) = chart_outputs(dash, controls);
    let lookup_text = presentation::lookup_text(&dash.lookup(controls.lookup_date));

    let fragment = ForecastingTemplate {
        symbol: &state.symbol,
        min_date: state.store.min_date().to_string(),
        max_date: state.store.max_date().to_string(),
        start: controls.range.start().to_string(),
        end: controls.range.end().to_string(),
        indicators: indicator_options(&controls.indicators),
        charts: &charts,
        lookup_date: controls
            .lookup_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        lookup_text: &lookup_text,
    }
    .render()?;
    respond(Page::Forecasting, state, headers, fragment)
}

/// Chart grid for the current range and overlays.
pub async fn charts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ChartsQuery>,
) -> Result<Response, WebError> {
    if !is_htmx_request(&headers) {
        return render_forecasting(&state, &headers, &query);
    }
    let dash = dashboard(&state);
    let controls = query.controls(dash.default_controls())?;
    let (_, charts) = chart_outputs(dash, controls);
    Ok(Html(ChartsTemplate { charts: &charts }.render()?).into_response())
}

/// Actual vs predicted close for one date, as a text fragment.
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, WebError> {
    let date = parse_date_param("lookup", query.date.as_deref())?;
    let dash = dashboard(&state);
    let (_, outcome) = dash.pick_date(dash.default_controls(), date);
    let text = presentation::lookup_text(&outcome);
    Ok(Html(LookupTemplate { text: &text }.render()?).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn defaults() -> Controls {
        Controls {
            range: DateRange::new(d(1), d(5)).unwrap(),
            indicators: IndicatorSelection::dashboard_default(),
            lookup_date: Some(d(1)),
        }
    }

    #[test]
    fn empty_query_keeps_defaults() {
        let controls = ChartsQuery::default().controls(defaults()).unwrap();
        assert_eq!(controls, defaults());
    }

    #[test]
    fn dates_override_bounds() {
        let query = ChartsQuery {
            start: Some("2024-01-02".into()),
            end: Some(" ".into()),
            ..Default::default()
        };
        let controls = query.controls(defaults()).unwrap();
        assert_eq!(controls.range.start(), d(2));
        assert_eq!(controls.range.end(), d(5));
    }

    #[test]
    fn reversed_range_is_bad_request() {
        let query = ChartsQuery {
            start: Some("2024-01-04".into()),
            end: Some("2024-01-02".into()),
            ..Default::default()
        };
        let err = query.controls(defaults()).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_date_is_bad_request() {
        let query = ChartsQuery {
            end: Some("05/01/2024".into()),
            ..Default::default()
        };
        let err = query.controls(defaults()).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(err.message.contains("end"));
    }

    #[test]
    fn submitted_form_with_no_boxes_clears_overlays() {
        let query = ChartsQuery {
            submitted: Some("1".into()),
            ..Default::default()
        };
        assert!(query.controls(defaults()).unwrap().indicators.is_empty());
    }

    #[test]
    fn checkboxes_and_lists_select_overlays() {
        let boxes = ChartsQuery {
            submitted: Some("1".into()),
            ema_30: Some("on".into()),
            sma_10: Some("on".into()),
            ..Default::default()
        };
        let selected: Vec<Indicator> = boxes.selection().unwrap().unwrap().iter().collect();
        assert_eq!(selected, vec![Indicator::Sma10, Indicator::Ema30]);

        let list = ChartsQuery {
            indicators: Some("ema_10".into()),
            ..Default::default()
        };
        let selected: Vec<Indicator> = list.selection().unwrap().unwrap().iter().collect();
        assert_eq!(selected, vec![Indicator::Ema10]);
    }

    #[test]
    fn unknown_indicator_is_bad_request() {
        let query = ChartsQuery {
            indicators: Some("RSI_14".into()),
            ..Default::default()
        };
        assert!(query.selection().is_err());
    }
}
