//! Load-once guard for the basemap.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use ratatui::widgets::canvas::MapResolution;
use tracing::{error, info};

use super::basemap::{Basemap, MapError};

type LoadFn = Box<dyn Fn() -> Result<Basemap, MapError> + Send + Sync>;

/// Loads the basemap the first time it is needed and caches the outcome.
///
/// The load function runs at most once per loader no matter how often the
/// map pane is mounted. A failed load is logged and remembered; later
/// mounts get `None` without retrying.
pub struct MapLoader {
    load: LoadFn,
    loaded: OnceLock<Option<Arc<Basemap>>>,
}

impl fmt::Debug for MapLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapLoader").field("loaded", &self.loaded.get().is_some()).finish()
    }
}

impl Default for MapLoader {
    fn default() -> Self {
        Self::new(|| Ok(Basemap::World(MapResolution::High)))
    }
}

impl MapLoader {
    /// Create a loader around an arbitrary load function.
    pub fn new<F>(load: F) -> Self
    where
        F: Fn() -> Result<Basemap, MapError> + Send + Sync + 'static,
    {
        Self {
            load: Box::new(load),
            loaded: OnceLock::new(),
        }
    }

    /// Loader for a GeoJSON file, or the bundled world map when `path` is `None`.
    pub fn from_config(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::new(move || Basemap::from_file(&path)),
            None => Self::default(),
        }
    }

    /// Mount the map: load the basemap if this is the first call.
    pub fn mount(&self) -> Option<Arc<Basemap>> {
        self.loaded
            .get_or_init(|| match (self.load)() {
                Ok(basemap) => {
                    info!("Basemap loaded");
                    Some(Arc::new(basemap))
                }
                Err(e) => {
                    error!("Failed to load basemap: {}", e);
                    None
                }
            })
            .clone()
    }

    /// Whether a load has been attempted.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}
