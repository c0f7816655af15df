use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ForecastError;

/// Hourly half of an Open-Meteo forecast. All vectors have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlySeries {
    pub time: Vec<NaiveDateTime>,
    pub temperature_2m: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub windspeed_10m: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Daily half of an Open-Meteo forecast. All vectors have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Validated forecast payload.
///
/// Index 0 of `hourly` is the current hour, index 0 of `daily` is today.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse {
    pub timezone: Option<String>,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct OmPayload {
    timezone: Option<String>,
    hourly: OmHourly,
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    windspeed_10m: Vec<Option<f64>>,
    weathercode: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    weathercode: Vec<Option<i32>>,
}

impl ForecastResponse {
    /// Check the raw provider body against the expected schema.
    ///
    /// A missing series, a missing field array or an unparseable timestamp is a
    /// [`ForecastError::DataShapeMismatch`]. Arrays of unequal length within a
    /// series are truncated to the shortest one.
    pub fn from_value(value: &Value) -> Result<Self, ForecastError> {
        let payload = OmPayload::deserialize(value)
            .map_err(|e| ForecastError::DataShapeMismatch(e.to_string()))?;

        let hourly = hourly_series(payload.hourly)?;
        let daily = daily_series(payload.daily)?;

        Ok(Self {
            timezone: payload.timezone,
            hourly,
            daily,
        })
    }
}

fn hourly_series(raw: OmHourly) -> Result<HourlySeries, ForecastError> {
    let OmHourly {
        mut time,
        mut temperature_2m,
        mut precipitation,
        mut windspeed_10m,
        mut weathercode,
    } = raw;

    let n = aligned_len(
        "hourly",
        &[
            time.len(),
            temperature_2m.len(),
            precipitation.len(),
            windspeed_10m.len(),
            weathercode.len(),
        ],
    );
    time.truncate(n);
    temperature_2m.truncate(n);
    precipitation.truncate(n);
    windspeed_10m.truncate(n);
    weathercode.truncate(n);

    let time = time.iter().map(String::as_str).map(parse_hour).collect::<Result<Vec<_>, _>>()?;

    Ok(HourlySeries {
        time,
        temperature_2m,
        precipitation,
        windspeed_10m,
        weathercode,
    })
}

fn daily_series(raw: OmDaily) -> Result<DailySeries, ForecastError> {
    let OmDaily {
        mut time,
        mut temperature_2m_max,
        mut temperature_2m_min,
        mut precipitation_sum,
        mut weathercode,
    } = raw;

    let n = aligned_len(
        "daily",
        &[
            time.len(),
            temperature_2m_max.len(),
            temperature_2m_min.len(),
            precipitation_sum.len(),
            weathercode.len(),
        ],
    );
    time.truncate(n);
    temperature_2m_max.truncate(n);
    temperature_2m_min.truncate(n);
    precipitation_sum.truncate(n);
    weathercode.truncate(n);

    let time = time.iter().map(String::as_str).map(parse_day).collect::<Result<Vec<_>, _>>()?;

    Ok(DailySeries {
        time,
        temperature_2m_max,
        temperature_2m_min,
        precipitation_sum,
        weathercode,
    })
}

fn aligned_len(series: &str, lens: &[usize]) -> usize {
    let n = lens.iter().copied().min().unwrap_or(0);
    if lens.iter().any(|&len| len != n) {
        tracing::warn!(series, ?lens, kept = n, "forecast arrays differ in length, truncating");
    }
    n
}

fn parse_hour(s: &str) -> Result<NaiveDateTime, ForecastError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| ForecastError::DataShapeMismatch(format!("bad hourly timestamp '{s}': {e}")))
}

fn parse_day(s: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ForecastError::DataShapeMismatch(format!("bad daily date '{s}': {e}")))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{Value, json};

    /// Open-Meteo-shaped body with `days` daily and `hours` hourly entries.
    pub fn payload(days: usize, hours: usize) -> Value {
        let hourly_time: Vec<String> = (0..hours)
            .map(|h| format!("2026-10-{:02}T{:02}:00", 14 + h / 24, h % 24))
            .collect();
        let daily_time: Vec<String> = (0..days).map(|d| format!("2026-10-{:02}", 14 + d)).collect();

        json!({
            "latitude": 37.5,
            "longitude": 127.0,
            "timezone": "Asia/Seoul",
            "hourly": {
                "time": hourly_time,
                "temperature_2m": (0..hours).map(|h| 10.0 + h as f64 * 0.5).collect::<Vec<_>>(),
                "precipitation": (0..hours).map(|h| (h % 4) as f64 * 0.3).collect::<Vec<_>>(),
                "windspeed_10m": (0..hours).map(|h| 3.0 + (h % 7) as f64).collect::<Vec<_>>(),
                "weathercode": (0..hours)
                    .map(|h| if h % 2 == 0 { 3 } else { 61 })
                    .collect::<Vec<_>>(),
            },
            "daily": {
                "time": daily_time,
                "temperature_2m_max": (0..days).map(|d| 20.0 + d as f64).collect::<Vec<_>>(),
                "temperature_2m_min": (0..days).map(|d| 8.0 + d as f64).collect::<Vec<_>>(),
                "precipitation_sum": (0..days).map(|d| d as f64 * 1.5).collect::<Vec<_>>(),
                "weathercode": (0..days).map(|d| if d == 0 { 95 } else { 1 }).collect::<Vec<_>>(),
            }
        })
    }
}
