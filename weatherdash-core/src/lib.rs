//! Core library for the `weatherdash` map dashboard.
//!
//! This crate defines:
//! - Weather-code classification
//! - Map location selection and viewport projection
//! - The Open-Meteo forecast fetcher and payload validation
//! - The presenter that turns a forecast into metrics, tables and a chart
//! - The dashboard controller tying these together per interaction
//! - Configuration handling
//!
//! It is used by `weatherdash-cli`, but carries no terminal code of its own.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod location;
pub mod model;
pub mod present;
pub mod provider;
pub mod weather_code;

pub use config::{ApiConfig, Config, MapConfig};
pub use dashboard::{Cycle, Dashboard, DashboardEvent, ReadyView};
pub use error::ForecastError;
pub use location::{Coordinate, LocationSelector, MapViewport};
pub use model::{DailySeries, ForecastResponse, HourlySeries};
pub use present::{
    ChartField, ChartSpec, ChartView, DailyTable, HourlyTable, Presentation, SummaryMetrics,
    chart, present,
};
pub use provider::{ForecastProvider, OpenMeteoProvider};
pub use weather_code::classify;
