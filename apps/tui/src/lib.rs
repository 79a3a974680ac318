// Precinct map core: filter state, map synchronization and the data service boundary
pub mod api;
pub mod config;
pub mod districts;
pub mod domain;
pub mod export;
pub mod filters;
pub mod format;
pub mod map;
pub mod selection;

pub use domain::{FilterSnapshot, Tier};
