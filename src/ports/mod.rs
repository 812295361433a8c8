//! Port traits: the seams between the dashboard core and its collaborators.

pub mod config_port;
pub mod data_port;
pub mod forecast_port;
