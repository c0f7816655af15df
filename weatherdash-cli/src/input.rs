use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use weatherdash_core::ChartField;

/// Something the user asked the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    /// Move the map cursor, in cursor steps (north, east).
    MoveCursor(i32, i32),
    /// Select the location under the map cursor.
    SelectCursor,
    /// Select the location under a terminal cell.
    Click { column: u16, row: u16 },
    /// Move the map window, in pan steps (north, east).
    Pan(i32, i32),
    ZoomIn,
    ZoomOut,
    NextChartField,
    SetChartField(ChartField),
    /// Move the chart tooltip by this many points.
    MoveTooltip(i32),
    ToggleRaw,
    ScrollRaw(i32),
}

pub(crate) fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Up => Some(Action::MoveCursor(1, 0)),
        KeyCode::Down => Some(Action::MoveCursor(-1, 0)),
        KeyCode::Left => Some(Action::MoveCursor(0, -1)),
        KeyCode::Right => Some(Action::MoveCursor(0, 1)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::SelectCursor),
        KeyCode::Char('w') => Some(Action::Pan(1, 0)),
        KeyCode::Char('s') => Some(Action::Pan(-1, 0)),
        KeyCode::Char('a') => Some(Action::Pan(0, -1)),
        KeyCode::Char('d') => Some(Action::Pan(0, 1)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::ZoomIn),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::ZoomOut),
        KeyCode::Tab => Some(Action::NextChartField),
        KeyCode::Char('1') => Some(Action::SetChartField(ChartField::Temperature)),
        KeyCode::Char('2') => Some(Action::SetChartField(ChartField::Precipitation)),
        KeyCode::Char('3') => Some(Action::SetChartField(ChartField::WindSpeed)),
        KeyCode::Char('[') => Some(Action::MoveTooltip(-1)),
        KeyCode::Char(']') => Some(Action::MoveTooltip(1)),
        KeyCode::Char('j') | KeyCode::Char('J') => Some(Action::ToggleRaw),
        KeyCode::PageUp => Some(Action::ScrollRaw(-10)),
        KeyCode::PageDown => Some(Action::ScrollRaw(10)),
        _ => None,
    }
}

pub(crate) fn map_mouse(mouse: MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Some(Action::Click {
                column: mouse.column,
                row: mouse.row,
            })
        }
        MouseEventKind::ScrollUp => Some(Action::ZoomIn),
        MouseEventKind::ScrollDown => Some(Action::ZoomOut),
        _ => None,
    }
}
