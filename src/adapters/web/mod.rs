//! Web server adapter.
//!
//! Axum router with an HTMX front end. Navigation and control changes are
//! HTMX requests answered with HTML fragments; plain requests get full pages.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::domain::store::StockStore;
use crate::ports::forecast_port::ForecastPort;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub store: Arc<StockStore>,
    pub oracle: Arc<dyn ForecastPort + Send + Sync>,
    pub symbol: String,
}

pub fn build_router(state: AppState) -> Router {
    build_router_with_static(state, "static")
}

pub fn build_router_with_static(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(handlers::page))
        .route("/about", get(handlers::page))
        .route("/forecasting", get(handlers::forecasting))
        .route("/forecasting/charts", get(handlers::charts))
        .route("/forecasting/lookup", get(handlers::lookup))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(handlers::page)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
