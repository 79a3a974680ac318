pub mod legend;
pub mod popup;
pub mod precinct_map;
pub mod precinct_popup;
