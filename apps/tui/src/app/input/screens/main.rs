use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_main_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Tab | KeyCode::Down => app.focus = app.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.focus = app.focus.prev(),
        KeyCode::Left => app.adjust_focused(false),
        KeyCode::Right => app.adjust_focused(true),
        KeyCode::Enter => app.apply_filters(),
        KeyCode::Char('e') => app.export_csv(),
        KeyCode::Char('h') => app.viewport.pan(-1.0, 0.0),
        KeyCode::Char('l') => app.viewport.pan(1.0, 0.0),
        KeyCode::Char('k') => app.viewport.pan(0.0, 1.0),
        KeyCode::Char('j') => app.viewport.pan(0.0, -1.0),
        KeyCode::Char('+' | '=') => app.viewport.zoom_in(),
        KeyCode::Char('-') => app.viewport.zoom_out(),
        KeyCode::Char('0') => app.viewport.reset(),
        KeyCode::Char('r') => app.remount_map(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}
