// Map module for precinct-map
// Precinct layer, viewport and the fetch/apply synchronization engine

pub mod layer;
pub mod style;
pub mod sync;
pub mod viewport;

pub use layer::{LayerFeature, PrecinctLayers};
pub use style::{tier_fill_color, DEFAULT_FILL_COLOR};
pub use sync::{Cursor, FetchState, MapSync, PointerTransition};
pub use viewport::Viewport;
