//! Map pane support: basemap loading and viewport math.
//!
//! The basemap is the map "runtime": it is loaded lazily the first time the
//! map pane is mounted and then reused for the rest of the process. Drawing
//! happens in [`crate::ui::map`].

mod basemap;
mod loader;
mod viewport;

pub use basemap::{Basemap, MapError};
pub use loader::MapLoader;
pub use viewport::{Viewport, DEFAULT_ZOOM, MAX_ZOOM};
