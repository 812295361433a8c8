#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Page routing, including the About fallback for unknown paths
//! - Forecasting page with controls and all six charts
//! - HTMX fragment vs full page responses
//! - Chart and lookup endpoints, and 400s for malformed parameters

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use stockcast::adapters::web::{AppState, build_router};
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

fn create_test_app() -> Router {
    let state = AppState {
        store: Arc::new(five_day_store()),
        oracle: Arc::new(MockForecastPort { offset: 0.5 }),
        symbol: "TEST.NS".to_string(),
    };
    build_router(state)
}

async fn get(uri: &str, htmx: bool) -> (StatusCode, String) {
    let mut request = Request::builder().uri(uri);
    if htmx {
        request = request.header("HX-Request", "true");
    }
    let response = create_test_app()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

mod page_tests {
    use super::*;

    #[tokio::test]
    async fn root_renders_about() {
        let (status, html) = get("/", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("About This Dashboard"));
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn about_mentions_symbol() {
        let (status, html) = get("/about", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("TEST.NS"));
    }

    #[tokio::test]
    async fn unknown_path_falls_back_to_about() {
        let (status, html) = get("/does/not/exist", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("About This Dashboard"));
    }

    #[tokio::test]
    async fn htmx_navigation_returns_fragment() {
        let (status, html) = get("/about", true).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<div id=\"content\""));
        assert!(!html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let (status, css) = get("/static/dashboard.css", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(css.contains(".chart-grid"));
    }
}

mod forecasting_tests {
    use super::*;

    const CHART_IDS: [&str; 6] = [
        "price-chart",
        "volume-chart",
        "volatility-chart",
        "daily-return-histogram",
        "correlation-heatmap",
        "forecast-chart",
    ];

    #[tokio::test]
    async fn forecasting_page_has_all_charts() {
        let (status, html) = get("/forecasting", false).await;
        assert_eq!(status, StatusCode::OK);
        for id in CHART_IDS {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(html.contains("Actual vs Mock Forecast"));
    }

    #[tokio::test]
    async fn forecasting_page_defaults_controls() {
        let (_, html) = get("/forecasting", false).await;
        assert!(html.contains("name=\"start\" value=\"2024-01-01\""));
        assert!(html.contains("name=\"end\" value=\"2024-01-05\""));
        assert!(html.contains("name=\"SMA_10\" checked"));
        assert!(html.contains("name=\"SMA_30\" checked"));
        assert!(!html.contains("name=\"EMA_10\" checked"));
        assert!(html.contains("hx-get=\"/forecasting/charts\""));
    }

    #[tokio::test]
    async fn forecasting_page_shows_first_day_lookup() {
        let (_, html) = get("/forecasting", false).await;
        assert!(html.contains(
            "On 2024-01-01: Actual Close Price = 100.0, Predicted Close Price = 99.5"
        ));
    }

    #[tokio::test]
    async fn trailing_slash_reaches_forecasting() {
        let (status, html) = get("/forecasting/", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("price-chart"));
    }
}

mod charts_tests {
    use super::*;

    #[tokio::test]
    async fn htmx_charts_fragment_only() {
        let (status, html) = get(
            "/forecasting/charts?start=2024-01-02&end=2024-01-04&submitted=1&EMA_10=on",
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.starts_with("<div id=\"charts\""));
        assert!(html.contains("EMA_10"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn full_request_renders_page_with_controls() {
        let (status, html) = get("/forecasting/charts?start=2024-01-03", false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("name=\"start\" value=\"2024-01-03\""));
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn empty_range_still_renders() {
        let (status, html) = get("/forecasting/charts?start=2023-01-01&end=2023-01-31", true).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("correlation-heatmap"));
        assert!(html.contains("Not enough complete rows"));
    }

    #[tokio::test]
    async fn reversed_range_is_bad_request() {
        let (status, html) = get("/forecasting/charts?start=2024-01-04&end=2024-01-02", true).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("Error 400"));
    }

    #[tokio::test]
    async fn malformed_date_is_bad_request() {
        let (status, _) = get("/forecasting/charts?start=yesterday", true).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_indicator_is_bad_request() {
        let (status, _) = get("/forecasting/charts?indicators=RSI_14", true).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn lookup_reports_actual_and_predicted() {
        let (status, html) = get("/forecasting/lookup?date=2024-01-04", true).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(
            "On 2024-01-04: Actual Close Price = 105.0, Predicted Close Price = 104.5"
        ));
    }

    #[tokio::test]
    async fn lookup_without_date_asks_for_one() {
        let (_, html) = get("/forecasting/lookup", true).await;
        assert!(html.contains("Please select a date."));
    }

    #[tokio::test]
    async fn lookup_of_non_trading_day() {
        let (status, html) = get("/forecasting/lookup?date=2024-01-06", true).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No data available for this date."));
    }

    #[tokio::test]
    async fn malformed_lookup_date_is_bad_request() {
        let (status, _) = get("/forecasting/lookup?date=06-01-2024", true).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
