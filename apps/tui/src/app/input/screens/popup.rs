use crate::app::state::App;
use crossterm::event::KeyCode;

/// Keys that belong to the open precinct popup. Everything else falls
/// through so the map stays usable underneath.
pub fn handle_popup_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc | KeyCode::Char('x') => {
            app.selection.close();
            true
        }
        _ => false,
    }
}
