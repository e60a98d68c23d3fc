//! Drafting configuration.

use crate::entities::{DEFAULT_CORNER_TOLERANCE, DEFAULT_LAYER};
use crate::error::DraftResult;
use crate::snap::{GridSnap, SnapSettings};
use crate::tracking::PolarTracking;
use crate::wall_types::DEFAULT_WALL_TYPE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-tunable drafting settings. Every field falls back to its default
/// when missing from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    pub snap: SnapSettings,
    pub polar: PolarTracking,
    pub grid: GridSnap,
    /// Pick radius of the select tool, in screen pixels.
    pub pick_tolerance: f64,
    /// World distance to the first vertex that closes a polyline.
    pub polyline_close_tolerance: f64,
    /// World distance under which wall ends are treated as joined.
    pub wall_join_tolerance: f64,
    /// Smallest corner distance the rectangle tool will commit.
    pub rect_min_corner_distance: f64,
    pub default_wall_type: String,
    /// Layer the drawing tools put new entities on.
    pub default_layer: String,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            polar: PolarTracking::default(),
            grid: GridSnap::default(),
            pick_tolerance: 5.0,
            polyline_close_tolerance: 0.5,
            wall_join_tolerance: DEFAULT_CORNER_TOLERANCE,
            rect_min_corner_distance: 0.1,
            default_wall_type: DEFAULT_WALL_TYPE.to_string(),
            default_layer: DEFAULT_LAYER.to_string(),
        }
    }
}

impl DraftSettings {
    pub fn from_json(json: &str) -> DraftResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DraftResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DraftResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapType;
    use std::io::Write;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = DraftSettings::from_json(r#"{"pick_tolerance": 8.0, "snap": {"snap_distance": 20.0}}"#).unwrap();
        assert_eq!(settings.pick_tolerance, 8.0);
        assert_eq!(settings.snap.snap_distance, 20.0);
        assert!(settings.snap.enabled);
        assert_eq!(settings.snap.priority[0], SnapType::Endpoint);
        assert_eq!(settings.polyline_close_tolerance, 0.5);
        assert_eq!(settings.default_wall_type, "interior-2x4");
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = DraftSettings::default();
        settings.grid.size = 0.25;
        settings.polar.increment_degrees = 45.0;
        let back = DraftSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid": {{"enabled": false}}}}"#).unwrap();
        let settings = DraftSettings::load(file.path()).unwrap();
        assert!(!settings.grid.enabled);
        assert_eq!(settings.grid.size, 1.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(DraftSettings::from_json("{not json").is_err());
    }
}
