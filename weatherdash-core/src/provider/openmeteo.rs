use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::{config::ApiConfig, error::ForecastError, location::Coordinate};

use super::{ForecastProvider, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Hourly variables requested, in request order.
pub const HOURLY_FIELDS: &str = "temperature_2m,precipitation,weathercode,windspeed_10m";

/// Daily variables requested, in request order.
pub const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Forecast horizon in days.
pub const FORECAST_DAYS: u8 = 7;

/// Open-Meteo `/v1/forecast` client. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    hourly: &'a str,
    daily: &'a str,
    timezone: &'a str,
    forecast_days: u8,
}

impl OpenMeteoProvider {
    /// `timeout` bounds the whole round trip, body included.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::Unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ForecastError> {
        Self::new(api.base_url.clone(), api.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch(&self, coordinate: Coordinate) -> Result<Value, ForecastError> {
        tracing::info!(%coordinate, "requesting forecast");

        let query = ForecastQuery {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            hourly: HOURLY_FIELDS,
            daily: DAILY_FIELDS,
            timezone: "auto",
            forecast_days: FORECAST_DAYS,
        };

        let res = self.http.get(&self.base_url).query(&query).send().await.map_err(|e| {
            tracing::warn!(error = %e, "forecast request failed to send");
            ForecastError::from(e)
        })?;

        let status = res.status();
        tracing::debug!(url = %res.url(), %status, "forecast response received");

        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "forecast request rejected");
            return Err(ForecastError::RequestFailed(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ForecastError::RequestFailed(format!("response body is not valid JSON: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::payload;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn coordinate() -> Coordinate {
        Coordinate::new(37.5, 127.25).expect("valid coordinate")
    }

    fn provider(server: &MockServer, timeout: Duration) -> OpenMeteoProvider {
        OpenMeteoProvider::new(format!("{}/v1/forecast", server.uri()), timeout)
            .expect("client builds")
    }

    #[tokio::test]
    async fn sends_expected_query_and_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "37.5"))
            .and(query_param("longitude", "127.25"))
            .and(query_param("hourly", HOURLY_FIELDS))
            .and(query_param("daily", DAILY_FIELDS))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload(7, 48)))
            .expect(1)
            .mount(&server)
            .await;

        let body = provider(&server, Duration::from_secs(5))
            .fetch(coordinate())
            .await
            .expect("fetch succeeds");

        assert_eq!(body, payload(7, 48));
    }

    #[tokio::test]
    async fn slow_response_is_a_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(payload(1, 1))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_millis(50))
            .fetch(coordinate())
            .await
            .unwrap_err();

        assert_eq!(err, ForecastError::Timeout);
    }

    #[tokio::test]
    async fn error_status_is_request_failed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":true,"reason":"Latitude must be in range"}"#),
            )
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_secs(5))
            .fetch(coordinate())
            .await
            .unwrap_err();

        let ForecastError::RequestFailed(detail) = err else {
            panic!("expected RequestFailed, got {err:?}");
        };
        assert!(detail.contains("400"));
        assert!(detail.contains("Latitude must be in range"));
    }

    #[tokio::test]
    async fn non_json_body_is_request_failed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_secs(5))
            .fetch(coordinate())
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::RequestFailed(ref d) if d.contains("not valid JSON")));
    }

    #[tokio::test]
    async fn body_without_series_is_still_returned() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"latitude": 37.5})),
            )
            .mount(&server)
            .await;

        let body = provider(&server, Duration::from_secs(5))
            .fetch(coordinate())
            .await
            .expect("shape is checked later");

        assert_eq!(body["latitude"], 37.5);
    }

    #[tokio::test]
    async fn unreachable_host_is_request_failed() {
        let provider =
            OpenMeteoProvider::new("http://127.0.0.1:1/v1/forecast", Duration::from_secs(2))
                .expect("client builds");

        let err = provider.fetch(coordinate()).await.unwrap_err();
        assert!(matches!(err, ForecastError::RequestFailed(_) | ForecastError::Timeout));
    }

    #[tokio::test]
    async fn malformed_base_url_is_unexpected() {
        let provider =
            OpenMeteoProvider::new("not a url", Duration::from_secs(1)).expect("client builds");

        let err = provider.fetch(coordinate()).await.unwrap_err();
        assert!(matches!(err, ForecastError::Unexpected(_)));
    }

    #[test]
    fn from_config_uses_configured_url() {
        let api = ApiConfig { base_url: "http://localhost:9/forecast".into(), timeout_secs: 3 };
        let provider = OpenMeteoProvider::from_config(&api).expect("client builds");
        assert_eq!(provider.base_url(), "http://localhost:9/forecast");
    }
}
