use crate::app::state::App;
use crossterm::event::KeyCode;

mod help;
mod main;
mod popup;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.selection.is_open() && popup::handle_popup_input(app, key) {
        return;
    }

    main::handle_main_input(app, key);
}
