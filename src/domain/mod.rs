//! Core domain types and logic.

pub mod chart;
pub mod date_range;
pub mod error;
pub mod forecast;
pub mod indicator;
pub mod interaction;
pub mod prepare;
pub mod query;
pub mod route;
pub mod stats;
pub mod stock_record;
pub mod store;
