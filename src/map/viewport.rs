//! Degree bounds of the visible map area.

use crate::geo::Location;

/// Zoom level used until the user changes it.
pub const DEFAULT_ZOOM: u8 = 14;
/// Deepest supported zoom level.
pub const MAX_ZOOM: u8 = 20;

/// Visible area in degrees: `x` is longitude, `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Viewport {
    /// Viewport centred on `center` at a web-map style zoom level.
    ///
    /// Zoom 0 shows the whole globe; each level halves the span. The latitude
    /// span is half the longitude span since terminal cells are about twice
    /// as tall as they are wide. Bounds are clamped to the globe.
    pub fn around(center: Location, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let lon_span = 360.0 / f64::from(1u32 << zoom);
        let lat_span = (lon_span / 2.0).min(180.0);

        Self {
            x_bounds: clamp_span(center.longitude, lon_span, -180.0, 180.0),
            y_bounds: clamp_span(center.latitude, lat_span, -90.0, 90.0),
        }
    }

    /// Whether a (longitude, latitude) point is visible.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.x_bounds[0]..=self.x_bounds[1]).contains(&lon)
            && (self.y_bounds[0]..=self.y_bounds[1]).contains(&lat)
    }
}

/// A window of width `span` centred on `center`, shifted to stay inside [min, max].
fn clamp_span(center: f64, span: f64, min: f64, max: f64) -> [f64; 2] {
    if span >= max - min {
        return [min, max];
    }
    let lo = (center - span / 2.0).clamp(min, max - span);
    [lo, lo + span]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_zero_shows_globe() {
        let viewport = Viewport::around(Location::fallback(), 0);
        assert_eq!(viewport.x_bounds, [-180.0, 180.0]);
        assert_eq!(viewport.y_bounds, [-90.0, 90.0]);
    }

    #[test]
    fn test_default_zoom_is_tight_and_centred() {
        let center = Location::fallback();
        let viewport = Viewport::around(center, DEFAULT_ZOOM);

        let width = viewport.x_bounds[1] - viewport.x_bounds[0];
        assert!((width - 360.0 / 16384.0).abs() < 1e-12);
        assert!(viewport.contains(center.longitude, center.latitude));

        let mid = (viewport.x_bounds[0] + viewport.x_bounds[1]) / 2.0;
        assert!((mid - center.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_clamped_at_edges() {
        let viewport = Viewport::around(Location::new(89.0, 179.0), 2);
        assert_eq!(viewport.x_bounds[1], 180.0);
        assert_eq!(viewport.y_bounds[1], 90.0);
        assert!((viewport.x_bounds[1] - viewport.x_bounds[0] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_capped() {
        assert_eq!(
            Viewport::around(Location::fallback(), 40),
            Viewport::around(Location::fallback(), MAX_ZOOM)
        );
    }
}
