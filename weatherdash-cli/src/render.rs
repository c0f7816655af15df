use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        *,
    },
};
use weatherdash_core::{
    ChartField, ChartSpec, ChartView, Cycle, DailyTable, ForecastProvider, HourlyTable,
    ReadyView,
    present::{NO_HOURLY_DATA, fmt_value},
};

use crate::app::App;

pub(crate) fn draw<P: ForecastProvider>(f: &mut Frame, app: &mut App<P>) {
    let area = f.area();
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" weatherdash ", Style::default().add_modifier(Modifier::BOLD)))
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(outer, area);

    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    render_header(f, rows[0], app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(cols[0]);

    render_map(f, left[0], app);
    render_hourly(f, left[1], app);

    if app.show_raw {
        render_raw(f, cols[1], app);
    } else {
        render_forecast(f, cols[1], app);
    }

    render_footer(f, rows[2], app);
}

fn render_header<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &App<P>) {
    let line = if let Some(c) = app.pending {
        Line::from(Span::styled(
            format!("Fetching weather data for {c}..."),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(c) = app.dashboard.cycle().coordinate() {
        let tz = app
            .dashboard
            .cycle()
            .ready()
            .and_then(|v| v.timezone.as_deref())
            .map(|tz| format!("  ({tz})"))
            .unwrap_or_default();
        Line::from(vec![
            Span::raw("Selected location: "),
            Span::styled(c.to_string(), Style::default().fg(Color::Green)),
            Span::raw(tz),
        ])
    } else {
        Line::from(Span::styled(
            "Click a location on the map to see its 7-day forecast.",
            Style::default().fg(Color::Cyan),
        ))
    };

    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Location")),
        area,
    );
}

fn render_map<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &mut App<P>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Map (zoom {})", app.viewport.zoom()));
    app.map_inner = block.inner(area);

    let selected = app.marker();
    let cursor = app.cursor;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(app.viewport.x_bounds())
        .y_bounds(app.viewport.y_bounds())
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::Green,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.print(
                cursor.longitude,
                cursor.latitude,
                Span::styled("+", Style::default().fg(Color::Yellow)),
            );
            if let Some(c) = selected {
                ctx.draw(&Points {
                    coords: &[(c.longitude, c.latitude)],
                    color: Color::Red,
                });
                ctx.print(
                    c.longitude,
                    c.latitude,
                    Span::styled(
                        "●",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    f.render_widget(canvas, area);
}

fn render_hourly<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &App<P>) {
    let block = Block::default().borders(Borders::ALL).title("Hourly forecast");
    let Some(view) = app.dashboard.cycle().ready() else {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let rows: Vec<Row> = view
        .presentation
        .hourly
        .rows
        .iter()
        .map(|h| {
            Row::new(vec![
                Cell::from(h.time.format("%m-%d %H:%M").to_string()),
                Cell::from(fmt_value(h.temperature)),
                Cell::from(fmt_value(h.precipitation)),
                Cell::from(fmt_value(h.wind_speed)),
                Cell::from(h.weather_code.map_or_else(|| "-".to_string(), |c| c.to_string())),
            ])
        })
        .collect();

    let header = Row::new(HourlyTable::COLUMNS.to_vec())
        .style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(16),
            Constraint::Length(20),
            Constraint::Length(17),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1)
    .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default().with_selected(Some(app.tooltip_index));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_forecast<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &App<P>) {
    let message = |text: String, color: Color| {
        Paragraph::new(text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Forecast"))
    };

    if app.pending.is_some() {
        f.render_widget(message("Fetching weather data...".into(), Color::Yellow), area);
        return;
    }

    match app.dashboard.cycle() {
        Cycle::AwaitingSelection => {
            let text = app.dashboard.notice().unwrap_or_default();
            f.render_widget(message(text, Color::Cyan), area);
        }
        Cycle::Failed { error, .. } => {
            f.render_widget(message(error.user_message(), Color::Red), area);
        }
        Cycle::Unavailable { error, .. } => {
            let text = format!("{}\nPress j to inspect the raw response.", error.user_message());
            f.render_widget(message(text, Color::Yellow), area);
        }
        Cycle::Ready(view) => render_ready(f, area, app, view),
    }
}

fn render_ready<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &App<P>, view: &ReadyView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(view.presentation.daily.len() as u16 + 3),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .split(area);

    render_summary(f, rows[0], view);
    render_daily(f, rows[1], &view.presentation.daily);
    render_field_tabs(f, rows[2], app.dashboard.chart_field());
    render_chart(f, rows[3], &view.chart, app.tooltip_index);
}

fn render_summary(f: &mut Frame, area: Rect, view: &ReadyView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(area);

    for (metric, area) in view.presentation.summary.metrics().iter().zip(cols.iter()) {
        let mut lines = vec![Line::from(Span::styled(
            metric.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if let Some(caption) = metric.caption {
            lines.push(Line::from(caption));
        }
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(metric.label)),
            *area,
        );
    }
}

fn render_daily(f: &mut Frame, area: Rect, daily: &DailyTable) {
    let rows: Vec<Row> = daily
        .rows
        .iter()
        .map(|d| {
            Row::new(vec![
                Cell::from(d.date.format("%a %m-%d").to_string()),
                Cell::from(d.condition),
                Cell::from(fmt_value(d.temperature_max)),
                Cell::from(fmt_value(d.temperature_min)),
                Cell::from(fmt_value(d.precipitation_sum)),
            ])
        })
        .collect();

    let header =
        Row::new(DailyTable::COLUMNS.to_vec()).style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("7-day daily summary"))
    .column_spacing(1);

    f.render_widget(table, area);
}

fn render_field_tabs(f: &mut Frame, area: Rect, selected: ChartField) {
    let titles: Vec<Line> = ChartField::all()
        .iter()
        .enumerate()
        .map(|(i, field)| Line::from(format!("{} {}", i + 1, field.label())))
        .collect();
    let idx = ChartField::all().iter().position(|field| *field == selected).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(idx)
        .block(Block::default().borders(Borders::ALL).title("Chart"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
        .divider(" | ");
    f.render_widget(tabs, area);
}

fn render_chart(f: &mut Frame, area: Rect, chart: &ChartView, tooltip_index: usize) {
    let spec = match chart {
        ChartView::Line(spec) => spec,
        ChartView::NoData => {
            f.render_widget(
                Paragraph::new(NO_HOURLY_DATA).block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let tooltip = spec.tooltip(tooltip_index).unwrap_or_default();
    f.render_widget(
        Paragraph::new(Span::styled(tooltip, Style::default().fg(Color::Yellow))),
        rows[0],
    );

    let points: Vec<(f64, f64)> = spec.points().map(|(i, v)| (i as f64, v)).collect();
    let hover: Vec<(f64, f64)> =
        points.iter().copied().filter(|(x, _)| *x as usize == tooltip_index).collect();

    let mut datasets = vec![
        Dataset::default()
            .name(spec.y_field)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&hover),
    ];
    if spec.show_points {
        datasets.insert(
            1,
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::White))
                .data(&points),
        );
    }

    let [y_lo, y_hi] = spec.y_bounds().unwrap_or([0.0, 1.0]);
    let x_hi = (spec.len().saturating_sub(1)).max(1) as f64;

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(spec.title.clone()))
        .x_axis(
            Axis::default()
                .title(spec.x_field)
                .bounds([0.0, x_hi])
                .labels(x_labels(spec)),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_field)
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::raw(format!("{y_lo:.1}")),
                    Span::raw(format!("{:.1}", (y_lo + y_hi) / 2.0)),
                    Span::raw(format!("{y_hi:.1}")),
                ]),
        );
    f.render_widget(chart, rows[1]);
}

fn x_labels(spec: &ChartSpec) -> Vec<Span<'static>> {
    let last = spec.len().saturating_sub(1);
    [0, last / 2, last]
        .iter()
        .filter_map(|&i| spec.x.get(i))
        .map(|t| Span::raw(t.format("%m-%d %H:%M").to_string()))
        .collect()
}

fn render_raw<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &App<P>) {
    let text = app
        .dashboard
        .cycle()
        .raw()
        .and_then(|raw| serde_json::to_string_pretty(raw).ok())
        .unwrap_or_else(|| "No API response yet.".to_string());

    let p = Paragraph::new(text)
        .scroll((app.raw_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Full API response (JSON)"));
    f.render_widget(p, area);
}

fn render_footer<P: ForecastProvider>(f: &mut Frame, area: Rect, app: &App<P>) {
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let spans = vec![
        key("click/Enter"),
        Span::raw(" select  "),
        key("arrows"),
        Span::raw(" cursor  "),
        key("wasd"),
        Span::raw(" pan  "),
        key("+/-"),
        Span::raw(" zoom  "),
        key("Tab/1-3"),
        Span::raw(" chart  "),
        key("[/]"),
        Span::raw(" tooltip  "),
        key("j"),
        Span::raw(if app.show_raw {
            " hide JSON  "
        } else {
            " show JSON  "
        }),
        key("q"),
        Span::raw(" quit"),
    ];

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Keys")),
        area,
    );
}
