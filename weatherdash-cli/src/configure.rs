use anyhow::{Context, Result};
use inquire::{CustomType, CustomUserError, Text, validator::Validation};
use std::path::{Path, PathBuf};
use weatherdash_core::{Config, location::MAX_ZOOM};

/// Load from `path`, or from the platform config dir when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

/// Walk the user through every setting and write the result back.
pub(crate) fn run(path: Option<&Path>) -> Result<PathBuf> {
    let mut cfg = load_config(path)?;

    cfg.api.base_url = Text::new("Forecast API URL:")
        .with_default(&cfg.api.base_url)
        .prompt()
        .context("Failed to read API URL")?;

    cfg.api.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(cfg.api.timeout_secs)
        .with_error_message("Please type a whole number of seconds")
        .with_validator(positive_timeout)
        .prompt()
        .context("Failed to read timeout")?;

    cfg.map.center_latitude = CustomType::<f64>::new("Map centre latitude:")
        .with_default(cfg.map.center_latitude)
        .with_error_message("Please type a number between -90 and 90")
        .with_validator(latitude_in_range)
        .prompt()
        .context("Failed to read latitude")?;

    cfg.map.center_longitude = CustomType::<f64>::new("Map centre longitude:")
        .with_default(cfg.map.center_longitude)
        .with_error_message("Please type a number between -180 and 180")
        .with_validator(longitude_in_range)
        .prompt()
        .context("Failed to read longitude")?;

    cfg.map.zoom = CustomType::<u8>::new("Initial map zoom (0-8):")
        .with_default(cfg.map.zoom)
        .with_error_message("Please type a whole number")
        .with_validator(zoom_in_range)
        .prompt()
        .context("Failed to read zoom")?;

    cfg.validate()?;

    match path {
        Some(p) => {
            cfg.save_to(p)?;
            Ok(p.to_path_buf())
        }
        None => cfg.save(),
    }
}

fn positive_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    if *secs == 0 {
        return Ok(Validation::Invalid("Timeout must be at least 1 second".into()));
    }
    Ok(Validation::Valid)
}

fn latitude_in_range(lat: &f64) -> Result<Validation, CustomUserError> {
    if !(-90.0..=90.0).contains(lat) {
        return Ok(Validation::Invalid("Latitude must be between -90 and 90".into()));
    }
    Ok(Validation::Valid)
}

fn longitude_in_range(lon: &f64) -> Result<Validation, CustomUserError> {
    if !(-180.0..=180.0).contains(lon) {
        return Ok(Validation::Invalid("Longitude must be between -180 and 180".into()));
    }
    Ok(Validation::Valid)
}

fn zoom_in_range(zoom: &u8) -> Result<Validation, CustomUserError> {
    if *zoom > MAX_ZOOM {
        return Ok(Validation::Invalid(format!("Zoom must be between 0 and {MAX_ZOOM}").into()));
    }
    Ok(Validation::Valid)
}
