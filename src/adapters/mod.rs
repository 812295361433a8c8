//! Concrete adapter implementations for ports, plus rendering.

pub mod chart_svg;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod linear_model_adapter;
pub mod presentation;
#[cfg(feature = "web")]
pub mod web;
