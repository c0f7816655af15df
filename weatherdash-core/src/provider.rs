use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{error::ForecastError, location::Coordinate};

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Source of raw forecast payloads.
///
/// Implementations make exactly one attempt per call. The returned JSON is
/// unvalidated; see [`crate::ForecastResponse::from_value`].
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, coordinate: Coordinate) -> Result<Value, ForecastError>;
}

#[async_trait]
impl<P: ForecastProvider + ?Sized> ForecastProvider for Box<P> {
    async fn fetch(&self, coordinate: Coordinate) -> Result<Value, ForecastError> {
        (**self).fetch(coordinate).await
    }
}

/// Cut an error body down to something that fits in a status line.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
