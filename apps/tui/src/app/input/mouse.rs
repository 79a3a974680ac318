use crate::app::state::App;
use crate::ui::screens::main::{map_area, popup_area};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

pub fn handle_map_mouse(app: &mut App, event: MouseEvent, screen: Rect) {
    if app.show_help {
        return;
    }

    let area = map_area(screen);
    let cell = Position::new(event.column, event.row);
    let over_popup = app.selection.is_open() && popup_area(area).contains(cell);
    let at = if over_popup {
        None
    } else {
        app.viewport.lon_lat_at(area, event.column, event.row)
    };

    match event.kind {
        MouseEventKind::Moved => {
            if let Some(transition) = app.map.pointer_moved(at) {
                tracing::trace!(?transition, "Pointer crossed a precinct edge");
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((lon, lat)) = at {
                app.map.click(lon, lat, &mut app.selection);
            }
        }
        MouseEventKind::ScrollUp if at.is_some() => app.viewport.zoom_in(),
        MouseEventKind::ScrollDown if at.is_some() => app.viewport.zoom_out(),
        _ => {}
    }
}
