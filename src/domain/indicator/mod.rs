//! Moving-average indicators shown on the price chart.
//!
//! - `Indicator`: the fixed set of overlay columns (SMA_10, SMA_30, EMA_10, EMA_30)
//! - `IndicatorSelection`: an ordered, duplicate-free choice of overlays
//!
//! The submodules hold the rolling calculations used when preparing the
//! processed CSV; the dashboard itself only reads materialized columns.

pub mod ema;
pub mod sma;
pub mod stddev;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    Sma10,
    Sma30,
    Ema10,
    Ema30,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::Sma10,
        Indicator::Sma30,
        Indicator::Ema10,
        Indicator::Ema30,
    ];

    /// Column name in the processed CSV, also the series label on the price chart.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Sma10 => "SMA_10",
            Indicator::Sma30 => "SMA_30",
            Indicator::Ema10 => "EMA_10",
            Indicator::Ema30 => "EMA_30",
        }
    }

    /// Human label for the selection control.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Sma10 => "SMA 10",
            Indicator::Sma30 => "SMA 30",
            Indicator::Ema10 => "EMA 10",
            Indicator::Ema30 => "EMA 30",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator: {0}")]
pub struct UnknownIndicator(pub String);

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA_10" => Ok(Indicator::Sma10),
            "SMA_30" => Ok(Indicator::Sma30),
            "EMA_10" => Ok(Indicator::Ema10),
            "EMA_30" => Ok(Indicator::Ema30),
            _ => Err(UnknownIndicator(s.to_string())),
        }
    }
}

/// Overlays chosen by the user. Keeps first-seen order and drops repeats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndicatorSelection(Vec<Indicator>);

impl IndicatorSelection {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn new<I: IntoIterator<Item = Indicator>>(indicators: I) -> Self {
        let mut selected = Vec::new();
        for indicator in indicators {
            if !selected.contains(&indicator) {
                selected.push(indicator);
            }
        }
        Self(selected)
    }

    /// Selection shown on first load.
    pub fn dashboard_default() -> Self {
        Self::new([Indicator::Sma10, Indicator::Sma30])
    }

    /// Parses a comma-separated list such as `SMA_10,EMA_30`.
    pub fn parse_list(list: &str) -> Result<Self, UnknownIndicator> {
        let indicators = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Indicator::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(indicators))
    }

    pub fn contains(&self, indicator: Indicator) -> bool {
        self.0.contains(&indicator)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.0.iter().copied()
    }
}
