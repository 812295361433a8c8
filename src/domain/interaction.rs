//! Dashboard interaction handling.
//!
//! Each control change is an [`Interaction`]; [`Dashboard::handle_interaction`]
//! applies it to the current [`Controls`] and recomputes only the outputs
//! that depend on the changed control. Nothing here knows about HTTP.

use chrono::NaiveDate;

use crate::domain::chart::ChartSpec;
use crate::domain::date_range::DateRange;
use crate::domain::error::DashboardError;
use crate::domain::indicator::IndicatorSelection;
use crate::domain::query::{self, CorrelationColumn, CorrelationMatrix, Lookup};
use crate::domain::store::StockStore;
use crate::ports::forecast_port::ForecastPort;

/// Current state of the Forecasting page controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub range: DateRange,
    pub indicators: IndicatorSelection,
    pub lookup_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    SetRange(DateRange),
    SetIndicators(IndicatorSelection),
    PickDate(Option<NaiveDate>),
}

/// The six chart outputs driven by the range and indicator controls.
#[derive(Debug)]
pub struct ChartPanel {
    pub price: ChartSpec,
    pub volume: ChartSpec,
    pub volatility: ChartSpec,
    pub histogram: ChartSpec,
    pub correlation: Result<CorrelationMatrix, DashboardError>,
    pub forecast: Result<ChartSpec, DashboardError>,
}

#[derive(Debug)]
pub enum LookupOutcome {
    NoDateSelected,
    Found(Lookup),
    Failed(DashboardError),
}

#[derive(Debug)]
pub enum Update {
    Charts(Box<ChartPanel>),
    Lookup(LookupOutcome),
}

/// Read-only view over the shared store and model.
#[derive(Clone, Copy)]
pub struct Dashboard<'a> {
    store: &'a StockStore,
    oracle: &'a dyn ForecastPort,
}

impl<'a> Dashboard<'a> {
    pub fn new(store: &'a StockStore, oracle: &'a dyn ForecastPort) -> Self {
        Self { store, oracle }
    }

    /// Full range, default overlays, lookup on the first trading day.
    pub fn default_controls(&self) -> Controls {
        Controls {
            range: self.store.full_range(),
            indicators: IndicatorSelection::dashboard_default(),
            lookup_date: Some(self.store.min_date()),
        }
    }

    pub fn handle_interaction(&self, controls: Controls, interaction: Interaction) -> (Controls, Update) {
        match interaction {
            Interaction::SetRange(range) => {
                let (controls, panel) = self.set_range(controls, range);
                (controls, Update::Charts(Box::new(panel)))
            }
            Interaction::SetIndicators(indicators) => {
                let (controls, panel) = self.set_indicators(controls, indicators);
                (controls, Update::Charts(Box::new(panel)))
            }
            Interaction::PickDate(date) => {
                let (controls, outcome) = self.pick_date(controls, date);
                (controls, Update::Lookup(outcome))
            }
        }
    }

    /// Clamps `range` to the store bounds and recomputes the charts.
    pub fn set_range(&self, controls: Controls, range: DateRange) -> (Controls, ChartPanel) {
        let controls = Controls {
            range: range.clamp_to(self.store.min_date(), self.store.max_date()),
            ..controls
        };
        let panel = self.charts(&controls);
        (controls, panel)
    }

    pub fn set_indicators(
        &self,
        controls: Controls,
        indicators: IndicatorSelection,
    ) -> (Controls, ChartPanel) {
        let controls = Controls {
            indicators,
            ..controls
        };
        let panel = self.charts(&controls);
        (controls, panel)
    }

    pub fn pick_date(&self, controls: Controls, date: Option<NaiveDate>) -> (Controls, LookupOutcome) {
        let controls = Controls {
            lookup_date: date,
            ..controls
        };
        let outcome = self.lookup(date);
        (controls, outcome)
    }

    pub fn charts(&self, controls: &Controls) -> ChartPanel {
        let records = query::filter_range(self.store, &controls.range);
        tracing::debug!(
            start = %controls.range.start(),
            end = %controls.range.end(),
            records = records.len(),
            "recomputing charts"
        );

        let correlation = query::build_correlation_matrix(records, &CorrelationColumn::ALL);
        let forecast = query::build_forecast_series(records, self.oracle);
        if let Err(e) = &forecast {
            tracing::warn!(error = %e, "forecast chart unavailable");
        }

        ChartPanel {
            price: query::build_price_series(records, &controls.indicators),
            volume: query::build_volume_series(records),
            volatility: query::build_volatility_series(records),
            histogram: query::build_return_histogram(records, query::DEFAULT_BUCKET_COUNT),
            correlation,
            forecast,
        }
    }

    pub fn lookup(&self, date: Option<NaiveDate>) -> LookupOutcome {
        let Some(date) = date else {
            return LookupOutcome::NoDateSelected;
        };
        match query::lookup_single_date(self.store, self.oracle, date) {
            Ok(lookup) => LookupOutcome::Found(lookup),
            Err(e) => {
                tracing::debug!(%date, error = %e, "lookup failed");
                LookupOutcome::Failed(e)
            }
        }
    }
}
