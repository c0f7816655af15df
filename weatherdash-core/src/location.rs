use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the valid lat/lon ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            bail!("Latitude {latitude} is out of range; expected a value in [-90, 90].");
        }
        if !(-180.0..=180.0).contains(&longitude) {
            bail!("Longitude {longitude} is out of range; expected a value in [-180, 180].");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate, pulling out-of-range values back onto the globe.
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {:.4}, lon {:.4}", self.latitude, self.longitude)
    }
}

/// The most recent map click. A new click replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationSelector {
    #[default]
    NoSelection,
    Selected(Coordinate),
}

impl LocationSelector {
    pub fn select(&mut self, coordinate: Coordinate) {
        *self = LocationSelector::Selected(coordinate);
    }

    pub fn current(&self) -> Option<Coordinate> {
        match self {
            LocationSelector::NoSelection => None,
            LocationSelector::Selected(c) => Some(*c),
        }
    }
}

/// Highest zoom level the map supports.
pub const MAX_ZOOM: u8 = 8;

/// Visible window of an equirectangular world map.
///
/// At zoom `z` the window spans `360 / 2^z` degrees of longitude and
/// `180 / 2^z` degrees of latitude around `center`. The window never leaves the
/// world, so every coordinate derived from it is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    center: Coordinate,
    zoom: u8,
}

impl MapViewport {
    pub fn new(center: Coordinate, zoom: u8) -> Self {
        let mut viewport = Self { center, zoom: zoom.min(MAX_ZOOM) };
        viewport.clamp_center();
        viewport
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powi(i32::from(self.zoom))
    }

    pub fn lat_span(&self) -> f64 {
        180.0 / 2f64.powi(i32::from(self.zoom))
    }

    /// `[west, east]`, ready for a canvas x axis.
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lon_span() / 2.0;
        [self.center.longitude - half, self.center.longitude + half]
    }

    /// `[south, north]`, ready for a canvas y axis.
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.lat_span() / 2.0;
        [self.center.latitude - half, self.center.latitude + half]
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        (west..=east).contains(&c.longitude) && (south..=north).contains(&c.latitude)
    }

    /// Coordinate under the centre of cell (`col`, `row`) of a `width` x `height`
    /// map drawing area. Row 0 is the northern edge.
    pub fn cell_to_coordinate(
        &self,
        col: u16,
        row: u16,
        width: u16,
        height: u16,
    ) -> Option<Coordinate> {
        if width == 0 || height == 0 || col >= width || row >= height {
            return None;
        }

        let [west, _] = self.x_bounds();
        let [_, north] = self.y_bounds();
        let fx = (f64::from(col) + 0.5) / f64::from(width);
        let fy = (f64::from(row) + 0.5) / f64::from(height);

        Some(Coordinate::clamped(
            north - fy * self.lat_span(),
            west + fx * self.lon_span(),
        ))
    }

    /// Move the window by a tenth of its span per step. Positive steps go north/east.
    pub fn pan(&mut self, lat_steps: i32, lon_steps: i32) {
        self.center.latitude += f64::from(lat_steps) * self.lat_span() / 10.0;
        self.center.longitude += f64::from(lon_steps) * self.lon_span() / 10.0;
        self.clamp_center();
    }

    pub fn zoom_in(&mut self) {
        if self.zoom < MAX_ZOOM {
            self.zoom += 1;
            self.clamp_center();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.zoom > 0 {
            self.zoom -= 1;
            self.clamp_center();
        }
    }

    /// Move `c` by a twentieth of the span per step, staying inside the window.
    pub fn nudge(&self, c: Coordinate, lat_steps: i32, lon_steps: i32) -> Coordinate {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        let lat = c.latitude + f64::from(lat_steps) * self.lat_span() / 20.0;
        let lon = c.longitude + f64::from(lon_steps) * self.lon_span() / 20.0;
        Coordinate::clamped(lat.clamp(south, north), lon.clamp(west, east))
    }

    fn clamp_center(&mut self) {
        let half_lat = self.lat_span() / 2.0;
        let half_lon = self.lon_span() / 2.0;
        self.center.latitude = self.center.latitude.clamp(-90.0 + half_lat, 90.0 - half_lat);
        self.center.longitude = self.center.longitude.clamp(-180.0 + half_lon, 180.0 - half_lon);
    }
}
