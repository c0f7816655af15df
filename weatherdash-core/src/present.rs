//! Turns a validated forecast into the artifacts the dashboard shows: three
//! summary metrics, a daily table, an hourly table and a single-series chart.
//!
//! Values are passed through untouched apart from weather-code labels and
//! timestamp parsing.

use anyhow::anyhow;
use chrono::{NaiveDate, NaiveDateTime};
use std::{fmt, str::FromStr};

use crate::{model::ForecastResponse, weather_code::classify};

/// Shown in place of a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown in place of the chart when there is nothing to plot.
pub const NO_HOURLY_DATA: &str = "Hourly data is not available.";

/// One summary tile: a headline value with an optional caption underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub caption: Option<&'static str>,
}

/// First element of each series, never an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub current_temperature: Option<f64>,
    pub current_condition: &'static str,
    pub today_max: Option<f64>,
    pub today_min: Option<f64>,
    pub today_condition: &'static str,
    pub today_precipitation: Option<f64>,
}

impl SummaryMetrics {
    pub fn from_forecast(forecast: &ForecastResponse) -> Self {
        let hourly = &forecast.hourly;
        let daily = &forecast.daily;

        Self {
            current_temperature: first(&hourly.temperature_2m),
            current_condition: classify(first(&hourly.weathercode)),
            today_max: first(&daily.temperature_2m_max),
            today_min: first(&daily.temperature_2m_min),
            today_condition: classify(first(&daily.weathercode)),
            today_precipitation: first(&daily.precipitation_sum),
        }
    }

    pub fn metrics(&self) -> [Metric; 3] {
        [
            Metric {
                label: "Current temperature",
                value: format!("{}°C", fmt_value(self.current_temperature)),
                caption: Some(self.current_condition),
            },
            Metric {
                label: "Today's high / low",
                value: format!(
                    "{}°C / {}°C",
                    fmt_value(self.today_max),
                    fmt_value(self.today_min)
                ),
                caption: Some(self.today_condition),
            },
            Metric {
                label: "Today's precipitation (expected)",
                value: format!("{} mm", fmt_value(self.today_precipitation)),
                caption: None,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub condition: &'static str,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyTable {
    pub rows: Vec<DailyRow>,
}

impl DailyTable {
    pub const COLUMNS: [&'static str; 5] =
        ["Date", "Weather", "Max temp (°C)", "Min temp (°C)", "Precipitation (mm)"];

    pub fn from_forecast(forecast: &ForecastResponse) -> Self {
        let d = &forecast.daily;
        let rows = (0..d.len())
            .map(|i| DailyRow {
                date: d.time[i],
                condition: classify(d.weathercode[i]),
                temperature_max: d.temperature_2m_max[i],
                temperature_min: d.temperature_2m_min[i],
                precipitation_sum: d.precipitation_sum[i],
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Left unclassified for inspection.
    pub weather_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlyTable {
    pub rows: Vec<HourlyRow>,
}

impl HourlyTable {
    pub const COLUMNS: [&'static str; 5] = [
        "Time",
        "Temperature (°C)",
        "Precipitation (mm/h)",
        "Wind speed (km/h)",
        "Weather code",
    ];

    pub fn from_forecast(forecast: &ForecastResponse) -> Self {
        let h = &forecast.hourly;
        let rows = (0..h.len())
            .map(|i| HourlyRow {
                time: h.time[i],
                temperature: h.temperature_2m[i],
                precipitation: h.precipitation[i],
                wind_speed: h.windspeed_10m[i],
                weather_code: h.weathercode[i],
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Which hourly column the chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartField {
    #[default]
    Temperature,
    Precipitation,
    WindSpeed,
}

impl ChartField {
    pub const fn all() -> &'static [ChartField] {
        &[ChartField::Temperature, ChartField::Precipitation, ChartField::WindSpeed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartField::Temperature => "temperature",
            ChartField::Precipitation => "precipitation",
            ChartField::WindSpeed => "wind",
        }
    }

    /// Name shown in the field picker.
    pub fn label(&self) -> &'static str {
        match self {
            ChartField::Temperature => "Temperature",
            ChartField::Precipitation => "Precipitation",
            ChartField::WindSpeed => "Wind speed",
        }
    }

    /// Hourly table column this field reads from.
    pub fn column(&self) -> &'static str {
        match self {
            ChartField::Temperature => HourlyTable::COLUMNS[1],
            ChartField::Precipitation => HourlyTable::COLUMNS[2],
            ChartField::WindSpeed => HourlyTable::COLUMNS[3],
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ChartField::Temperature => "°C",
            ChartField::Precipitation => "mm/h",
            ChartField::WindSpeed => "km/h",
        }
    }

    /// The field after this one, wrapping around.
    pub fn next(&self) -> ChartField {
        let all = Self::all();
        let i = all.iter().position(|f| f == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }

    fn value(&self, row: &HourlyRow) -> Option<f64> {
        match self {
            ChartField::Temperature => row.temperature,
            ChartField::Precipitation => row.precipitation,
            ChartField::WindSpeed => row.wind_speed,
        }
    }
}

impl fmt::Display for ChartField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ChartField {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "temperature" | "temp" => Ok(ChartField::Temperature),
            "precipitation" | "precip" | "rain" => Ok(ChartField::Precipitation),
            "wind" | "windspeed" | "wind_speed" => Ok(ChartField::WindSpeed),
            _ => Err(anyhow!(
                "Unknown chart field '{value}'. Supported fields: temperature, precipitation, wind."
            )),
        }
    }
}

impl FromStr for ChartField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartField::try_from(s)
    }
}

/// A single-series line chart over the hourly table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub field: ChartField,
    pub title: String,
    pub x_field: &'static str,
    pub y_field: &'static str,
    pub x: Vec<NaiveDateTime>,
    pub y: Vec<Option<f64>>,
    pub show_points: bool,
}

impl ChartSpec {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Hover text for point `index`: timestamp and value to one decimal place.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let time = self.x.get(index)?;
        let value = match self.y.get(index)? {
            Some(v) => format!("{v:.1} {}", self.field.unit()),
            None => NOT_AVAILABLE.to_string(),
        };
        Some(format!("{} · {}: {value}", time.format("%Y-%m-%d %H:%M"), self.field.label()))
    }

    /// Value range of the series, not anchored at zero.
    ///
    /// A flat series is widened by one unit on each side so it still has height.
    pub fn y_bounds(&self) -> Option<[f64; 2]> {
        let mut values = self.y.iter().flatten().copied();
        let first = values.next()?;
        let (lo, hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo == hi {
            Some([lo - 1.0, hi + 1.0])
        } else {
            Some([lo, hi])
        }
    }

    /// Plottable points as `(index, value)`, skipping gaps.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.y.iter().enumerate().filter_map(|(i, v)| v.map(|v| (i, v)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Line(ChartSpec),
    NoData,
}

/// Build the chart for `field`. An empty hourly table yields [`ChartView::NoData`].
pub fn chart(hourly: &HourlyTable, field: ChartField) -> ChartView {
    if hourly.is_empty() {
        return ChartView::NoData;
    }

    ChartView::Line(ChartSpec {
        field,
        title: format!("Hourly {}", field.label().to_lowercase()),
        x_field: HourlyTable::COLUMNS[0],
        y_field: field.column(),
        x: hourly.rows.iter().map(|r| r.time).collect(),
        y: hourly.rows.iter().map(|r| field.value(r)).collect(),
        show_points: true,
    })
}

/// Everything derived from one forecast, except the chart, which depends on
/// the user's field choice.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub summary: SummaryMetrics,
    pub daily: DailyTable,
    pub hourly: HourlyTable,
}

pub fn present(forecast: &ForecastResponse) -> Presentation {
    Presentation {
        summary: SummaryMetrics::from_forecast(forecast),
        daily: DailyTable::from_forecast(forecast),
        hourly: HourlyTable::from_forecast(forecast),
    }
}

/// Render an optional value the way the provider sent it, or `N/A`.
/// Whole numbers keep one decimal, so `10.0` stays `10.0`.
pub fn fmt_value(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn first<T: Copy>(values: &[Option<T>]) -> Option<T> {
    values.first().copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::payload;
    use crate::weather_code::UNKNOWN_WEATHER;
    use serde_json::json;

    fn forecast(days: usize, hours: usize) -> ForecastResponse {
        ForecastResponse::from_value(&payload(days, hours)).expect("valid payload")
    }

    #[test]
    fn table_row_counts_match_series() {
        let f = forecast(7, 48);
        let p = present(&f);
        assert_eq!(p.daily.len(), 7);
        assert_eq!(p.hourly.len(), 48);

        let f = forecast(3, 5);
        let p = present(&f);
        assert_eq!(p.daily.len(), 3);
        assert_eq!(p.hourly.len(), 5);
    }

    #[test]
    fn daily_rows_are_index_aligned_and_classified() {
        let f = forecast(7, 24);
        let p = present(&f);

        for (i, row) in p.daily.rows.iter().enumerate() {
            assert_eq!(row.date, f.daily.time[i]);
            assert_eq!(row.condition, classify(f.daily.weathercode[i]));
            assert_eq!(row.temperature_max, f.daily.temperature_2m_max[i]);
            assert_eq!(row.temperature_min, f.daily.temperature_2m_min[i]);
            assert_eq!(row.precipitation_sum, f.daily.precipitation_sum[i]);
        }
        assert_eq!(p.daily.rows[0].condition, "⚡️ Thunderstorm");
    }

    #[test]
    fn hourly_rows_keep_raw_code() {
        let f = forecast(1, 48);
        let p = present(&f);

        for (i, row) in p.hourly.rows.iter().enumerate() {
            assert_eq!(row.time, f.hourly.time[i]);
            assert_eq!(row.temperature, f.hourly.temperature_2m[i]);
            assert_eq!(row.precipitation, f.hourly.precipitation[i]);
            assert_eq!(row.wind_speed, f.hourly.windspeed_10m[i]);
            assert_eq!(row.weather_code, f.hourly.weathercode[i]);
        }
        assert_eq!(p.hourly.rows[1].weather_code, Some(61));
    }

    #[test]
    fn summary_uses_first_elements_verbatim() {
        let mut body = payload(7, 48);
        body["daily"]["temperature_2m_max"] = json!([31.4, 99.0, 99.0, 99.0, 99.0, 99.0, 99.0]);
        body["daily"]["temperature_2m_min"] =
            json!([-2.5, -50.0, -50.0, -50.0, -50.0, -50.0, -50.0]);
        let f = ForecastResponse::from_value(&body).expect("valid payload");

        let s = SummaryMetrics::from_forecast(&f);
        assert_eq!(s.current_temperature, f.hourly.temperature_2m[0]);
        assert_eq!(s.current_condition, classify(f.hourly.weathercode[0]));
        assert_eq!(s.today_max, Some(31.4));
        assert_eq!(s.today_min, Some(-2.5));
        assert_eq!(s.today_precipitation, f.daily.precipitation_sum[0]);
        assert_eq!(s.today_condition, "⚡️ Thunderstorm");
    }

    #[test]
    fn metrics_format_values() {
        let f = forecast(7, 48);
        let [current, range, precip] = SummaryMetrics::from_forecast(&f).metrics();

        assert_eq!(current.value, "10.0°C");
        assert_eq!(current.caption, Some("☁️ Overcast"));
        assert_eq!(range.value, "20.0°C / 8.0°C");
        assert_eq!(precip.value, "0.0 mm");
        assert_eq!(precip.caption, None);
    }

    #[test]
    fn whole_values_keep_one_decimal() {
        assert_eq!(fmt_value(Some(10.0)), "10.0");
        assert_eq!(fmt_value(Some(-3.0)), "-3.0");
        assert_eq!(fmt_value(Some(11.25)), "11.25");
        assert_eq!(fmt_value(Some(0.3)), "0.3");
        assert_eq!(fmt_value(None), NOT_AVAILABLE);
    }

    #[test]
    fn summary_of_empty_series_is_not_available() {
        let f = forecast(0, 0);
        let s = SummaryMetrics::from_forecast(&f);
        assert_eq!(s.current_temperature, None);
        assert_eq!(s.current_condition, UNKNOWN_WEATHER);

        let [current, range, precip] = s.metrics();
        assert_eq!(current.value, "N/A°C");
        assert_eq!(range.value, "N/A°C / N/A°C");
        assert_eq!(precip.value, "N/A mm");
    }

    #[test]
    fn switching_field_changes_only_y() {
        let f = forecast(7, 48);
        let hourly = HourlyTable::from_forecast(&f);

        let charts: Vec<ChartSpec> = ChartField::all()
            .iter()
            .map(|field| match chart(&hourly, *field) {
                ChartView::Line(spec) => spec,
                ChartView::NoData => panic!("expected a chart"),
            })
            .collect();

        for spec in &charts {
            assert_eq!(spec.x_field, "Time");
            assert_eq!(spec.x, charts[0].x);
            assert_eq!(spec.len(), 48);
            assert!(spec.show_points);
        }
        assert_eq!(charts[0].y_field, "Temperature (°C)");
        assert_eq!(charts[1].y_field, "Precipitation (mm/h)");
        assert_eq!(charts[2].y_field, "Wind speed (km/h)");
        assert_ne!(charts[0].y, charts[1].y);
    }

    #[test]
    fn precipitation_chart_is_verbatim() {
        let f = forecast(7, 48);
        let hourly = HourlyTable::from_forecast(&f);

        let ChartView::Line(spec) = chart(&hourly, ChartField::Precipitation) else {
            panic!("expected a chart");
        };
        assert_eq!(spec.y, f.hourly.precipitation);
        assert_eq!(spec.title, "Hourly precipitation");
    }

    #[test]
    fn empty_hourly_yields_no_data() {
        assert_eq!(chart(&HourlyTable::default(), ChartField::Temperature), ChartView::NoData);
    }

    #[test]
    fn tooltip_shows_one_decimal() {
        let f = forecast(1, 3);
        let hourly = HourlyTable::from_forecast(&f);
        let ChartView::Line(spec) = chart(&hourly, ChartField::Temperature) else {
            panic!("expected a chart");
        };

        assert_eq!(spec.tooltip(1).as_deref(), Some("2026-10-14 01:00 · Temperature: 10.5 °C"));
        assert_eq!(spec.tooltip(3), None);
    }

    #[test]
    fn y_bounds_are_not_zero_based() {
        let f = forecast(1, 4);
        let hourly = HourlyTable::from_forecast(&f);
        let ChartView::Line(spec) = chart(&hourly, ChartField::Temperature) else {
            panic!("expected a chart");
        };
        assert_eq!(spec.y_bounds(), Some([10.0, 11.5]));
    }

    #[test]
    fn flat_series_gets_padded_bounds() {
        let mut body = payload(1, 3);
        body["hourly"]["windspeed_10m"] = json!([5.0, null, 5.0]);
        let f = ForecastResponse::from_value(&body).expect("valid payload");
        let ChartView::Line(spec) = chart(&HourlyTable::from_forecast(&f), ChartField::WindSpeed)
        else {
            panic!("expected a chart");
        };

        assert_eq!(spec.y_bounds(), Some([4.0, 6.0]));
        assert_eq!(spec.points().collect::<Vec<_>>(), vec![(0, 5.0), (2, 5.0)]);
        assert_eq!(spec.tooltip(1).as_deref(), Some("2026-10-14 01:00 · Wind speed: N/A"));
    }

    #[test]
    fn chart_field_parsing() {
        for field in ChartField::all() {
            assert_eq!(ChartField::try_from(field.as_str()).expect("roundtrip"), *field);
        }
        assert_eq!("Rain".parse::<ChartField>().expect("alias"), ChartField::Precipitation);

        let err = ChartField::try_from("humidity").unwrap_err();
        assert!(err.to_string().contains("Unknown chart field"));
    }

    #[test]
    fn chart_field_cycles() {
        assert_eq!(ChartField::Temperature.next(), ChartField::Precipitation);
        assert_eq!(ChartField::Precipitation.next(), ChartField::WindSpeed);
        assert_eq!(ChartField::WindSpeed.next(), ChartField::Temperature);
    }
}
