//! Process settings read from the INI config, with environment overrides.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATA_PATH: &str = "data/stock_data_processed.csv";
pub const DEFAULT_MODEL_PATH: &str = "models/prophet_model.ini";
pub const DEFAULT_SYMBOL: &str = "RELIANCE.NS";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub symbol: String,
    pub model_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            symbol: DEFAULT_SYMBOL.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Builds settings from `config`. `env` looks up environment variables;
    /// non-empty `PORT` and `HOST` win over the file.
    pub fn from_config(
        config: &dyn ConfigPort,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DashboardError> {
        let text = |section: &str, key: &str, default: &str| {
            config
                .get_string(section, key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let env_value = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let host_raw = env_value("HOST").unwrap_or_else(|| text("web", "host", DEFAULT_HOST));
        let host = host_raw.trim().parse::<IpAddr>().map_err(|_| DashboardError::ConfigInvalid {
            section: "web".into(),
            key: "host".into(),
            reason: format!("not an IP address: {host_raw:?}"),
        })?;

        let port_raw = env_value("PORT").unwrap_or_else(|| text("web", "port", &DEFAULT_PORT.to_string()));
        let port = parse_port(&port_raw)?;

        Ok(Self {
            data_path: PathBuf::from(text("data", "path", DEFAULT_DATA_PATH)),
            symbol: text("data", "symbol", DEFAULT_SYMBOL),
            model_path: PathBuf::from(text("model", "path", DEFAULT_MODEL_PATH)),
            host,
            port,
            log_level: text("logging", "level", DEFAULT_LOG_LEVEL),
        })
    }

    /// Settings from the real process environment.
    pub fn from_config_and_env(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        Self::from_config(config, |key| std::env::var(key).ok())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16, DashboardError> {
    let invalid = || DashboardError::ConfigInvalid {
        section: "web".into(),
        key: "port".into(),
        reason: format!("must be an integer in 1..=65535, got {raw:?}"),
    };
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(port) => Ok(port),
    }
}
