use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use weatherdash_core::{ChartField, Coordinate, Cycle, Dashboard, DashboardEvent, OpenMeteoProvider};

use crate::{app, configure, logging, text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Click a map, get a 7-day forecast (Open-Meteo)")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive map dashboard (default).
    Dashboard {
        /// Latitude to load on startup.
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude to load on startup.
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// Write logs here; the dashboard does not log otherwise.
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Fetch one forecast and print it.
    Show {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Hourly series to list: temperature, precipitation or wind.
        #[arg(long, default_value = "temperature")]
        chart: ChartField,

        /// Print the raw API response instead.
        #[arg(long)]
        json: bool,
    },

    /// Interactively edit the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = self.config.as_deref();

        match self.command {
            None => run_dashboard(config_path, None, None).await,
            Some(Command::Dashboard { lat, lon, log_file }) => {
                if let Some(path) = &log_file {
                    logging::init_file(path)?;
                }
                let start = match (lat, lon) {
                    (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
                    _ => None,
                };
                run_dashboard(config_path, start, log_file.as_deref()).await
            }
            Some(Command::Show { lat, lon, chart, json }) => {
                logging::init_stderr("warn")?;
                show(config_path, Coordinate::new(lat, lon)?, chart, json).await
            }
            Some(Command::Configure) => {
                logging::init_stderr("warn")?;
                let path = configure::run(config_path)?;
                println!("Configuration saved to {}", path.display());
                Ok(())
            }
        }
    }
}

async fn run_dashboard(
    config_path: Option<&Path>,
    start: Option<Coordinate>,
    log_file: Option<&Path>,
) -> Result<()> {
    let cfg = configure::load_config(config_path)?;
    let provider = OpenMeteoProvider::from_config(&cfg.api)
        .context("Failed to set up forecast client")?;

    tracing::info!(base_url = provider.base_url(), ?log_file, "starting dashboard");

    let mut app = app::App::new(Dashboard::new(provider), cfg.map.viewport());
    if let Some(c) = start {
        app.select(c);
    }
    app::run(app).await
}

async fn show(
    config_path: Option<&Path>,
    coordinate: Coordinate,
    field: ChartField,
    json: bool,
) -> Result<()> {
    let cfg = configure::load_config(config_path)?;
    let provider = OpenMeteoProvider::from_config(&cfg.api)
        .context("Failed to set up forecast client")?;

    let mut dashboard = Dashboard::new(provider).with_chart_field(field);
    let cycle = dashboard.handle(DashboardEvent::LocationSelected(coordinate)).await;

    if json {
        if let Some(raw) = cycle.raw() {
            println!("{}", serde_json::to_string_pretty(raw)?);
            return Ok(());
        }
    }

    match cycle {
        Cycle::Ready(view) => {
            print!("{}", text::ready_report(view));
            Ok(())
        }
        Cycle::Unavailable { error, .. } => {
            println!("{}", error.user_message());
            Ok(())
        }
        Cycle::Failed { error, .. } => bail!("{}", error.user_message()),
        Cycle::AwaitingSelection => bail!("No location was selected"),
    }
}
