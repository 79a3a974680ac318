// Filters module for precinct-map
// Live/applied filter state and its query-string encoding

pub mod query;
pub mod store;

pub use query::{decode, encode};
pub use store::FilterStore;
