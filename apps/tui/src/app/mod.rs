// App module for precinct-map
// Holds UI state and routes input into the core components

pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, SidebarField};
