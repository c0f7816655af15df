use thiserror::Error;

/// Everything that can end a fetch-and-render cycle early.
///
/// None of these are retried. The dashboard shows [`ForecastError::user_message`]
/// inline and waits for the next interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("forecast request timed out")]
    Timeout,

    #[error("forecast request failed: {0}")]
    RequestFailed(String),

    #[error("unexpected error while fetching forecast: {0}")]
    Unexpected(String),

    #[error("forecast payload has an unexpected shape: {0}")]
    DataShapeMismatch(String),
}

impl ForecastError {
    /// Message suitable for showing to the user in place of the forecast.
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::Timeout => {
                "The weather API request timed out. Check your network connection and try again."
                    .to_string()
            }
            ForecastError::RequestFailed(detail) => {
                format!("Failed to fetch weather data: {detail}")
            }
            ForecastError::Unexpected(detail) => {
                format!("An unexpected error occurred: {detail}")
            }
            ForecastError::DataShapeMismatch(_) => "Weather data is unavailable.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForecastError::Timeout
        } else if err.is_builder() {
            ForecastError::Unexpected(err.to_string())
        } else {
            ForecastError::RequestFailed(err.to_string())
        }
    }
}
