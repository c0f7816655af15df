//! Explicit reactive state for one dashboard session.
//!
//! A new location runs the whole pipeline (fetch, validate, present, chart).
//! A new chart field only rebuilds the chart from the hourly table already held.

use serde_json::Value;

use crate::{
    error::ForecastError,
    location::{Coordinate, LocationSelector},
    model::ForecastResponse,
    present::{ChartField, ChartView, Presentation, chart, present},
    provider::ForecastProvider,
};

/// User interactions the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardEvent {
    LocationSelected(Coordinate),
    ChartFieldChanged(ChartField),
}

/// A successfully presented forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub coordinate: Coordinate,
    pub timezone: Option<String>,
    pub raw: Value,
    pub presentation: Presentation,
    pub chart: ChartView,
}

/// Outcome of the most recent fetch-and-render cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cycle {
    #[default]
    AwaitingSelection,
    /// The fetch itself failed; nothing else is shown.
    Failed {
        coordinate: Coordinate,
        error: ForecastError,
    },
    /// The provider answered, but not with a usable forecast.
    Unavailable {
        coordinate: Coordinate,
        error: ForecastError,
        raw: Value,
    },
    Ready(Box<ReadyView>),
}

impl Cycle {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Cycle::AwaitingSelection => None,
            Cycle::Failed { coordinate, .. } | Cycle::Unavailable { coordinate, .. } => {
                Some(*coordinate)
            }
            Cycle::Ready(view) => Some(view.coordinate),
        }
    }

    /// Raw provider body, when one was received.
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Cycle::Unavailable { raw, .. } => Some(raw),
            Cycle::Ready(view) => Some(&view.raw),
            _ => None,
        }
    }

    pub fn ready(&self) -> Option<&ReadyView> {
        match self {
            Cycle::Ready(view) => Some(view),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard<P> {
    provider: P,
    selector: LocationSelector,
    chart_field: ChartField,
    cycle: Cycle,
}

impl<P: ForecastProvider> Dashboard<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            selector: LocationSelector::default(),
            chart_field: ChartField::default(),
            cycle: Cycle::default(),
        }
    }

    pub fn with_chart_field(mut self, field: ChartField) -> Self {
        self.chart_field = field;
        self
    }

    pub fn selector(&self) -> &LocationSelector {
        &self.selector
    }

    pub fn chart_field(&self) -> ChartField {
        self.chart_field
    }

    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    /// Apply one interaction. Errors end up in [`Dashboard::cycle`], never here.
    pub async fn handle(&mut self, event: DashboardEvent) -> &Cycle {
        match event {
            DashboardEvent::LocationSelected(coordinate) => {
                self.selector.select(coordinate);
                self.cycle = self.run_cycle(coordinate).await;
            }
            DashboardEvent::ChartFieldChanged(field) => {
                self.chart_field = field;
                if let Cycle::Ready(view) = &mut self.cycle {
                    view.chart = chart(&view.presentation.hourly, field);
                }
            }
        }
        &self.cycle
    }

    /// Line shown to the user for the current cycle, if any.
    pub fn notice(&self) -> Option<String> {
        match &self.cycle {
            Cycle::AwaitingSelection => {
                Some("Click a location on the map to see its weather.".to_string())
            }
            Cycle::Failed { error, .. } | Cycle::Unavailable { error, .. } => {
                Some(error.user_message())
            }
            Cycle::Ready(_) => None,
        }
    }

    async fn run_cycle(&self, coordinate: Coordinate) -> Cycle {
        let raw = match self.provider.fetch(coordinate).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%coordinate, %error, "forecast cycle aborted");
                return Cycle::Failed { coordinate, error };
            }
        };

        let forecast = match ForecastResponse::from_value(&raw) {
            Ok(forecast) => forecast,
            Err(error) => {
                tracing::warn!(%coordinate, %error, "forecast data unavailable");
                return Cycle::Unavailable {
                    coordinate,
                    error,
                    raw,
                };
            }
        };

        let presentation = present(&forecast);
        let chart = chart(&presentation.hourly, self.chart_field);

        tracing::info!(
            %coordinate,
            days = presentation.daily.len(),
            hours = presentation.hourly.len(),
            "forecast presented"
        );

        Cycle::Ready(Box::new(ReadyView {
            coordinate,
            timezone: forecast.timezone,
            raw,
            presentation,
            chart,
        }))
    }
}
