//! Coastline data drawn underneath the location marker.

use std::fs;
use std::path::Path;

use ratatui::widgets::canvas::MapResolution;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading a basemap.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to read basemap {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Basemap is not valid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Basemap contains no drawable lines")]
    Empty,
}

/// Outline data for the map pane.
#[derive(Debug, Clone)]
pub enum Basemap {
    /// The world coastline bundled with the terminal widget library.
    World(MapResolution),
    /// Polylines of (longitude, latitude) pairs read from a GeoJSON file.
    Outline(Vec<Vec<(f64, f64)>>),
}

impl Basemap {
    /// Read a GeoJSON file of LineString/Polygon geometries.
    pub fn from_file(path: &Path) -> Result<Self, MapError> {
        let content = fs::read_to_string(path).map_err(|source| MapError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_geojson(&content)
    }

    /// Parse GeoJSON text (a FeatureCollection, Feature or bare geometry).
    pub fn from_geojson(text: &str) -> Result<Self, MapError> {
        let value: Value = serde_json::from_str(text)?;
        let mut lines = Vec::new();
        collect_lines(&value, &mut lines);

        if lines.is_empty() {
            return Err(MapError::Empty);
        }
        Ok(Basemap::Outline(lines))
    }
}

fn collect_lines(value: &Value, out: &mut Vec<Vec<(f64, f64)>>) {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            for feature in value.get("features").and_then(Value::as_array).into_iter().flatten() {
                collect_lines(feature, out);
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry") {
                collect_lines(geometry, out);
            }
        }
        Some("GeometryCollection") => {
            for geometry in value.get("geometries").and_then(Value::as_array).into_iter().flatten() {
                collect_lines(geometry, out);
            }
        }
        Some("LineString") => {
            out.extend(value.get("coordinates").and_then(polyline));
        }
        Some("MultiLineString") | Some("Polygon") => {
            out.extend(rings(value.get("coordinates")));
        }
        Some("MultiPolygon") => {
            for polygon in value.get("coordinates").and_then(Value::as_array).into_iter().flatten() {
                out.extend(rings(Some(polygon)));
            }
        }
        _ => {}
    }
}

fn rings(value: Option<&Value>) -> Vec<Vec<(f64, f64)>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(polyline)
        .collect()
}

fn polyline(value: &Value) -> Option<Vec<(f64, f64)>> {
    let points: Vec<(f64, f64)> = value
        .as_array()?
        .iter()
        .filter_map(|point| {
            let pair = point.as_array()?;
            Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
        })
        .collect();

    (points.len() >= 2).then_some(points)
}
