//! HTML templates using Askama.
//!
//! Each page template renders only the `#content` fragment. Full-page
//! responses wrap that fragment in [`BasePage`].

use askama::Template;

use crate::adapters::presentation::RenderedChart;
use crate::domain::indicator::{Indicator, IndicatorSelection};
use crate::domain::route::Page;

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub brand: &'a str,
    pub content: &'a str,
}

/// Wraps a rendered fragment in the site layout.
pub fn full_page(page: Page, symbol: &str, content: &str) -> Result<String, askama::Error> {
    let brand = format!("{symbol} Stock Analysis");
    BasePage {
        title: page.title(),
        active: page.title(),
        brand: &brand,
        content,
    }
    .render()
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate<'a> {
    pub symbol: &'a str,
}

/// One checkbox in the overlay selector.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorOption {
    pub column: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

pub fn indicator_options(selection: &IndicatorSelection) -> Vec<IndicatorOption> {
    Indicator::ALL
        .into_iter()
        .map(|indicator| IndicatorOption {
            column: indicator.column(),
            label: indicator.label(),
            checked: selection.contains(indicator),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "forecasting.html")]
pub struct ForecastingTemplate<'a> {
    pub symbol: &'a str,
    pub min_date: String,
    pub max_date: String,
    pub start: String,
    pub end: String,
    pub indicators: Vec<IndicatorOption>,
    pub charts: &'a [RenderedChart],
    pub lookup_date: String,
    pub lookup_text: &'a str,
}

#[derive(Template)]
#[template(path = "charts.html")]
pub struct ChartsTemplate<'a> {
    pub charts: &'a [RenderedChart],
}

#[derive(Template)]
#[template(path = "lookup.html")]
pub struct LookupTemplate<'a> {
    pub text: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
