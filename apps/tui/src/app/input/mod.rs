pub mod helpers;
mod mouse;
pub mod screens;

use crate::app::state::App;
use crossterm::event::{KeyCode, MouseEvent};
use ratatui::layout::Rect;

pub fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key);
}

/// `screen` is the full terminal area the frame was drawn into.
pub fn handle_mouse(app: &mut App, event: MouseEvent, screen: Rect) {
    mouse::handle_map_mouse(app, event, screen);
}
