//! Plain-text rendering for `weatherdash show`.

use std::fmt::Write;
use weatherdash_core::{
    ChartView, DailyTable, HourlyTable, ReadyView, SummaryMetrics,
    present::{NO_HOURLY_DATA, fmt_value},
};

pub(crate) fn ready_report(view: &ReadyView) -> String {
    let mut out = String::new();
    let tz = view.timezone.as_deref().map(|tz| format!(" ({tz})")).unwrap_or_default();
    let _ = writeln!(out, "Selected location: {}{tz}", view.coordinate);
    out.push('\n');
    out.push_str(&summary(&view.presentation.summary));
    out.push('\n');
    out.push_str(&daily(&view.presentation.daily));
    out.push('\n');
    out.push_str(&chart_series(&view.presentation.hourly, &view.chart));
    out
}

pub(crate) fn summary(summary: &SummaryMetrics) -> String {
    let mut out = String::new();
    for metric in summary.metrics() {
        let _ = write!(out, "{:<34} {}", format!("{}:", metric.label), metric.value);
        if let Some(caption) = metric.caption {
            let _ = write!(out, "  {caption}");
        }
        out.push('\n');
    }
    out
}

pub(crate) fn daily(table: &DailyTable) -> String {
    let mut out = String::new();
    let [date, weather, max, min, precip] = DailyTable::COLUMNS;
    let _ = writeln!(out, "{date:<10}  {max:>13}  {min:>13}  {precip:>18}  {weather}");
    for row in &table.rows {
        let _ = writeln!(
            out,
            "{:<10}  {:>13}  {:>13}  {:>18}  {}",
            row.date.format("%Y-%m-%d").to_string(),
            fmt_value(row.temperature_max),
            fmt_value(row.temperature_min),
            fmt_value(row.precipitation_sum),
            row.condition,
        );
    }
    out
}

/// The plotted series as a two-column listing.
pub(crate) fn chart_series(hourly: &HourlyTable, chart: &ChartView) -> String {
    let spec = match chart {
        ChartView::Line(spec) => spec,
        ChartView::NoData => return format!("{NO_HOURLY_DATA}\n"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} ({} points)", spec.title, hourly.len());
    let _ = writeln!(out, "{:<16}  {}", spec.x_field, spec.y_field);
    for (time, value) in spec.x.iter().zip(&spec.y) {
        let value = value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"));
        let _ = writeln!(out, "{:<16}  {value}", time.format("%Y-%m-%d %H:%M").to_string());
    }
    out
}
