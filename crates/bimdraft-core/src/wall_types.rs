//! Wall assembly descriptors and the registry walls resolve them from.

use crate::entities::SerializableColor;
use crate::error::{DraftError, DraftResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Drawing units are feet; wall layer thicknesses are given in inches.
pub const INCHES_PER_UNIT: f64 = 12.0;

/// Wall type used when nothing else is configured.
pub const DEFAULT_WALL_TYPE: &str = "interior-2x4";

/// Role of a layer inside the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerFunction {
    Finish,
    Substrate,
    Structure,
    Insulation,
    Membrane,
    Air,
}

/// One material layer of a wall assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLayer {
    pub material: String,
    /// Thickness in inches.
    pub thickness: f64,
    pub function: LayerFunction,
}

impl WallLayer {
    pub fn new(material: impl Into<String>, thickness: f64, function: LayerFunction) -> Self {
        Self {
            material: material.into(),
            thickness,
            function,
        }
    }
}

/// A wall assembly: ordered layer stack from exterior to interior face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallType {
    pub id: String,
    pub name: String,
    pub layers: Vec<WallLayer>,
    pub color: SerializableColor,
}

impl WallType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, layers: Vec<WallLayer>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layers,
            color: SerializableColor::new(128, 128, 128, 255),
        }
    }

    /// Total assembly thickness in inches.
    pub fn actual_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }

    /// Total assembly thickness in drawing units.
    pub fn thickness(&self) -> f64 {
        self.actual_thickness() / INCHES_PER_UNIT
    }
}

/// Lookup table of wall types, passed explicitly to whatever needs it.
#[derive(Debug, Clone, Default)]
pub struct WallTypeRegistry {
    types: BTreeMap<String, WallType>,
}

impl WallTypeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the stock assemblies.
    pub fn with_defaults() -> Self {
        use LayerFunction::*;
        let mut registry = Self::new();
        registry.register(WallType::new(
            "interior-2x4",
            "Interior 2x4 Partition",
            vec![
                WallLayer::new("Gypsum Board", 0.5, Finish),
                WallLayer::new("Wood Stud 2x4", 3.5, Structure),
                WallLayer::new("Gypsum Board", 0.5, Finish),
            ],
        ));
        registry.register(WallType::new(
            "exterior-2x6",
            "Exterior 2x6 Wood Frame",
            vec![
                WallLayer::new("Lap Siding", 0.75, Finish),
                WallLayer::new("OSB Sheathing", 0.5, Substrate),
                WallLayer::new("Wood Stud 2x6 w/ Batt", 5.5, Structure),
                WallLayer::new("Vapor Retarder", 0.0, Membrane),
                WallLayer::new("Gypsum Board", 0.5, Finish),
            ],
        ));
        registry.register(WallType::new(
            "cmu-8",
            "8\" Concrete Masonry",
            vec![WallLayer::new("CMU Block", 7.625, Structure)],
        ));
        registry.register(WallType::new(
            "cavity-brick",
            "Brick Cavity Wall",
            vec![
                WallLayer::new("Face Brick", 3.625, Finish),
                WallLayer::new("Air Gap", 2.0, Air),
                WallLayer::new("Rigid Insulation", 2.0, Insulation),
                WallLayer::new("CMU Block", 7.625, Structure),
            ],
        ));
        registry
    }

    /// Add or replace a wall type, returning the previous entry.
    pub fn register(&mut self, wall_type: WallType) -> Option<WallType> {
        log::debug!("Registering wall type {}", wall_type.id);
        self.types.insert(wall_type.id.clone(), wall_type)
    }

    pub fn get(&self, id: &str) -> DraftResult<&WallType> {
        self.types
            .get(id)
            .ok_or_else(|| DraftError::UnknownWallType(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
