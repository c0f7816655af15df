use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    io::{self, Stdout},
    time::Duration,
};
use weatherdash_core::{
    ChartView, Coordinate, Dashboard, DashboardEvent, ForecastProvider, MapViewport,
};

use crate::{
    input::{Action, map_key, map_mouse},
    render,
};

/// Terminal-side state wrapped around the dashboard controller.
#[derive(Debug)]
pub(crate) struct App<P> {
    pub(crate) dashboard: Dashboard<P>,
    pub(crate) viewport: MapViewport,
    pub(crate) cursor: Coordinate,
    /// Drawing area of the map canvas as of the last frame, for mouse hit tests.
    pub(crate) map_inner: Rect,
    /// Location waiting to be fetched once the loading frame is on screen.
    pub(crate) pending: Option<Coordinate>,
    pub(crate) tooltip_index: usize,
    pub(crate) show_raw: bool,
    pub(crate) raw_scroll: u16,
    pub(crate) should_quit: bool,
}

impl<P: ForecastProvider> App<P> {
    pub(crate) fn new(dashboard: Dashboard<P>, viewport: MapViewport) -> Self {
        Self {
            dashboard,
            viewport,
            cursor: viewport.center(),
            map_inner: Rect::default(),
            pending: None,
            tooltip_index: 0,
            show_raw: false,
            raw_scroll: 0,
            should_quit: false,
        }
    }

    /// Queue `coordinate` for fetching on the next loop turn.
    pub(crate) fn select(&mut self, coordinate: Coordinate) {
        self.cursor = coordinate;
        self.pending = Some(coordinate);
    }

    /// Where the map marker goes: the click being fetched, else the last one.
    pub(crate) fn marker(&self) -> Option<Coordinate> {
        self.pending.or_else(|| self.dashboard.selector().current())
    }

    pub(crate) async fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveCursor(north, east) => {
                self.cursor = self.viewport.nudge(self.cursor, north, east);
            }
            Action::SelectCursor => self.select(self.cursor),
            Action::Click { column, row } => {
                if let Some(c) = self.coordinate_at(column, row) {
                    self.select(c);
                }
            }
            Action::Pan(north, east) => {
                self.viewport.pan(north, east);
                self.keep_cursor_visible();
            }
            Action::ZoomIn => {
                self.viewport.zoom_in();
                self.keep_cursor_visible();
            }
            Action::ZoomOut => {
                self.viewport.zoom_out();
                self.keep_cursor_visible();
            }
            Action::NextChartField => {
                let next = self.dashboard.chart_field().next();
                self.dashboard.handle(DashboardEvent::ChartFieldChanged(next)).await;
            }
            Action::SetChartField(field) => {
                self.dashboard.handle(DashboardEvent::ChartFieldChanged(field)).await;
            }
            Action::MoveTooltip(delta) => self.move_tooltip(delta),
            Action::ToggleRaw => {
                self.show_raw = !self.show_raw;
                self.raw_scroll = 0;
            }
            Action::ScrollRaw(delta) => {
                let next = i32::from(self.raw_scroll) + delta;
                self.raw_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
            }
        }
    }

    /// Run the fetch for a queued selection, if there is one.
    pub(crate) async fn run_pending(&mut self) -> bool {
        let Some(coordinate) = self.pending.take() else {
            return false;
        };
        self.dashboard.handle(DashboardEvent::LocationSelected(coordinate)).await;
        self.tooltip_index = 0;
        self.raw_scroll = 0;
        true
    }

    fn coordinate_at(&self, column: u16, row: u16) -> Option<Coordinate> {
        let inner = self.map_inner;
        let col = column.checked_sub(inner.x)?;
        let row = row.checked_sub(inner.y)?;
        self.viewport.cell_to_coordinate(col, row, inner.width, inner.height)
    }

    fn keep_cursor_visible(&mut self) {
        if !self.viewport.contains(self.cursor) {
            self.cursor = self.viewport.nudge(self.cursor, 0, 0);
        }
    }

    fn move_tooltip(&mut self, delta: i32) {
        let len = match self.dashboard.cycle().ready().map(|v| &v.chart) {
            Some(ChartView::Line(spec)) => spec.len(),
            _ => 0,
        };
        if len == 0 {
            self.tooltip_index = 0;
            return;
        }
        let next = self.tooltip_index as i64 + i64::from(delta);
        self.tooltip_index = next.clamp(0, len as i64 - 1) as usize;
    }
}

/// Take over the terminal, run the dashboard until the user quits, and give it back.
pub(crate) async fn run<P: ForecastProvider>(mut app: App<P>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop<P: ForecastProvider>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<P>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| render::draw(f, app))?;

        // The loading frame is already on screen; block on the fetch now.
        if app.run_pending().await {
            continue;
        }

        if event::poll(Duration::from_millis(250))? {
            let action = match event::read()? {
                Event::Key(k) => map_key(k),
                Event::Mouse(m) => map_mouse(m),
                _ => None,
            };
            if let Some(action) = action {
                app.apply(action).await;
            }
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut out = io::stdout();
    execute!(out, DisableMouseCapture, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    term.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use weatherdash_core::{ChartField, Cycle, ForecastError};

    #[derive(Debug)]
    struct ThreeHours;

    #[async_trait]
    impl ForecastProvider for ThreeHours {
        async fn fetch(&self, _coordinate: Coordinate) -> Result<Value, ForecastError> {
            Ok(json!({
                "timezone": "UTC",
                "hourly": {
                    "time": ["2026-10-14T00:00", "2026-10-14T01:00", "2026-10-14T02:00"],
                    "temperature_2m": [1.0, 2.0, 3.0],
                    "precipitation": [0.0, 0.5, 0.0],
                    "windspeed_10m": [4.0, 5.0, 6.0],
                    "weathercode": [0, 61, 3]
                },
                "daily": {
                    "time": ["2026-10-14"],
                    "temperature_2m_max": [3.0],
                    "temperature_2m_min": [1.0],
                    "precipitation_sum": [0.5],
                    "weathercode": [61]
                }
            }))
        }
    }

    fn app() -> App<ThreeHours> {
        let viewport = MapViewport::new(Coordinate::clamped(0.0, 0.0), 0);
        let mut app = App::new(Dashboard::new(ThreeHours), viewport);
        app.map_inner = Rect::new(10, 5, 4, 2);
        app
    }

    #[tokio::test]
    async fn click_inside_map_queues_selection() {
        let mut app = app();
        app.apply(Action::Click { column: 10, row: 5 }).await;

        let pending = app.pending.expect("queued");
        assert_eq!(pending, Coordinate::clamped(45.0, -135.0));
        assert_eq!(app.dashboard.cycle(), &Cycle::AwaitingSelection);

        assert!(app.run_pending().await);
        assert!(app.dashboard.cycle().ready().is_some());
        assert_eq!(app.dashboard.selector().current(), Some(pending));
        assert!(!app.run_pending().await);
    }

    #[tokio::test]
    async fn marker_moves_to_new_click_before_fetch() {
        let mut app = app();
        assert_eq!(app.marker(), None);

        let first = Coordinate::clamped(10.0, 10.0);
        app.select(first);
        assert_eq!(app.marker(), Some(first));
        app.run_pending().await;
        assert_eq!(app.marker(), Some(first));

        let second = Coordinate::clamped(-20.0, 40.0);
        app.select(second);
        assert_eq!(app.dashboard.selector().current(), Some(first));
        assert_eq!(app.marker(), Some(second));

        app.run_pending().await;
        assert_eq!(app.marker(), Some(second));
    }

    #[tokio::test]
    async fn click_outside_map_is_ignored() {
        let mut app = app();
        app.apply(Action::Click { column: 9, row: 5 }).await;
        app.apply(Action::Click { column: 14, row: 6 }).await;
        assert_eq!(app.pending, None);
    }

    #[tokio::test]
    async fn enter_selects_cursor() {
        let mut app = app();
        app.apply(Action::MoveCursor(1, 1)).await;
        app.apply(Action::SelectCursor).await;
        assert_eq!(app.pending, Some(Coordinate::clamped(9.0, 18.0)));
    }

    #[tokio::test]
    async fn tooltip_is_clamped_to_chart() {
        let mut app = app();
        app.apply(Action::MoveTooltip(1)).await;
        assert_eq!(app.tooltip_index, 0);

        app.select(Coordinate::clamped(1.0, 1.0));
        app.run_pending().await;

        app.apply(Action::MoveTooltip(5)).await;
        assert_eq!(app.tooltip_index, 2);
        app.apply(Action::MoveTooltip(-10)).await;
        assert_eq!(app.tooltip_index, 0);
    }

    #[tokio::test]
    async fn chart_keys_reach_dashboard() {
        let mut app = app();
        app.select(Coordinate::clamped(1.0, 1.0));
        app.run_pending().await;

        app.apply(Action::NextChartField).await;
        assert_eq!(app.dashboard.chart_field(), ChartField::Precipitation);

        app.apply(Action::SetChartField(ChartField::WindSpeed)).await;
        let Some(ChartView::Line(spec)) = app.dashboard.cycle().ready().map(|v| &v.chart) else {
            panic!("expected a chart");
        };
        assert_eq!(spec.y, vec![Some(4.0), Some(5.0), Some(6.0)]);
    }

    #[tokio::test]
    async fn raw_viewer_starts_collapsed() {
        let mut app = app();
        assert!(!app.show_raw);
        app.apply(Action::ToggleRaw).await;
        assert!(app.show_raw);
        app.apply(Action::ScrollRaw(-10)).await;
        assert_eq!(app.raw_scroll, 0);
        app.apply(Action::ScrollRaw(10)).await;
        assert_eq!(app.raw_scroll, 10);
    }

    #[tokio::test]
    async fn zooming_keeps_cursor_on_screen() {
        let mut app = app();
        app.cursor = Coordinate::clamped(80.0, 170.0);
        app.apply(Action::ZoomIn).await;
        app.apply(Action::ZoomIn).await;
        assert!(app.viewport.contains(app.cursor));
    }
}
