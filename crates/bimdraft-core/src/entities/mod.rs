//! Drawing entities: geometric primitives with style, bounds and hit-testing.

mod arc;
mod circle;
mod dimension;
mod line;
mod polyline;
mod rectangle;
mod room;
mod text;
mod wall;

pub use arc::Arc;
pub use circle::Circle;
pub use dimension::{Dimension, DimensionType};
pub use line::Line;
pub use polyline::Polyline;
pub use rectangle::Rectangle;
pub use room::{Room, RoomFinishes, RoomProperties, RoomType};
pub use text::{HorizontalAlignment, Text, TextAlignment, VerticalAlignment};
pub use wall::{Wall, WallCornerTable, WallEnds, DEFAULT_CORNER_TOLERANCE};

use crate::error::{DraftError, DraftResult};
use crate::geometry::{Vector2, rect_contains_inclusive};
use crate::snap::{SnapPoint, SnapType};
use crate::wall_types::WallTypeRegistry;
use kurbo::{Affine, BezPath, PathEl, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Layer every new entity lands on unless told otherwise.
pub const DEFAULT_LAYER: &str = "0";

/// Closed set of entity type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Line,
    Circle,
    Arc,
    Rectangle,
    Polyline,
    Spline,
    Text,
    Dimension,
    Point,
    Room,
    Wall,
}

/// Line pattern override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    Hidden,
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style defaults supplied by the layer registry at render time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub color: SerializableColor,
    pub line_weight: f64,
    pub line_type: LineType,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            line_weight: 0.25,
            line_type: LineType::Solid,
        }
    }
}

/// Style after applying entity overrides on top of layer defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub color: Color,
    pub line_weight: f64,
    pub line_type: LineType,
}

fn default_true() -> bool {
    true
}

/// Identity, style overrides and flags shared by every entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProperties {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_type: Option<LineType>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl EntityProperties {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            layer: DEFAULT_LAYER.to_string(),
            color: None,
            line_weight: None,
            line_type: None,
            visible: true,
            locked: false,
            selected: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Entity override wins over the layer default.
    pub fn resolve_style(&self, layer: Option<&LayerStyle>) -> ResolvedStyle {
        let fallback = layer.copied().unwrap_or_default();
        ResolvedStyle {
            color: self.color.unwrap_or(fallback.color).into(),
            line_weight: self.line_weight.unwrap_or(fallback.line_weight),
            line_type: self.line_type.unwrap_or(fallback.line_type),
        }
    }
}

/// Lazily computed bounding box with a dirty flag.
///
/// Uses a lock for interior mutability so entities stay `Send + Sync`.
#[derive(Debug, Default)]
pub(crate) struct BoundsCache(RwLock<Option<Rect>>);

impl Clone for BoundsCache {
    fn clone(&self) -> Self {
        Self(RwLock::new(self.0.read().ok().and_then(|guard| *guard)))
    }
}

impl BoundsCache {
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> Rect) -> Rect {
        if let Some(rect) = self.0.read().ok().and_then(|guard| *guard) {
            return rect;
        }
        let rect = compute();
        if let Ok(mut cache) = self.0.write() {
            *cache = Some(rect);
        }
        rect
    }

    pub(crate) fn invalidate(&self) {
        if let Ok(mut cache) = self.0.write() {
            *cache = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self) -> bool {
        self.0.read().map(|guard| guard.is_none()).unwrap_or(true)
    }
}

/// Capabilities every entity provides.
pub trait EntityTrait {
    fn properties(&self) -> &EntityProperties;

    fn properties_mut(&mut self) -> &mut EntityProperties;

    fn id(&self) -> EntityId {
        self.properties().id
    }

    /// Axis-aligned bounds, cached until the geometry changes.
    fn bounding_box(&self) -> Rect;

    /// Inclusive on all four edges.
    fn is_in_bounding_box(&self, point: Vector2) -> bool {
        rect_contains_inclusive(self.bounding_box(), point)
    }

    fn distance_to_point(&self, point: Vector2) -> f64;

    /// Near-the-geometry test (perimeter semantics for closed shapes).
    fn contains_point(&self, point: Vector2, tolerance: f64) -> bool {
        self.distance_to_point(point) <= tolerance
    }

    /// Window-selection test.
    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool;

    /// Mutate the geometry in place.
    fn transform(&mut self, matrix: &Affine);

    /// Feature points for the requested snap types. Unsupported types
    /// contribute nothing.
    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint>;

    /// World-space outline for the rendering collaborator.
    fn to_path(&self) -> BezPath;
}

/// Entities that can report the closest point on themselves.
pub trait NearestPoint {
    fn nearest_point(&self, point: Vector2) -> Vector2;
}

/// Straight-segment entities that can drop a perpendicular.
pub trait PerpendicularFoot {
    /// Foot of the perpendicular from `from`, if it lands on the entity.
    fn perpendicular_foot(&self, from: Vector2) -> Option<Vector2>;
}

/// Entities with an interior (filled-area semantics).
pub trait FilledArea {
    fn contains_point_inside(&self, point: Vector2) -> bool;
}

/// Helper for entity snap enumeration.
pub(crate) fn push_snap(
    out: &mut Vec<SnapPoint>,
    types: &[SnapType],
    kind: SnapType,
    entity: EntityId,
    points: impl IntoIterator<Item = Vector2>,
) {
    if types.contains(&kind) {
        out.extend(points.into_iter().map(|point| SnapPoint { point, kind, entity }));
    }
}

/// Persisted form of an entity: shared properties plus type-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub properties: EntityProperties,
    pub data: serde_json::Value,
}

/// Enum wrapper for all entity types.
#[derive(Debug, Clone)]
pub enum Entity {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Rectangle(Rectangle),
    Polyline(Polyline),
    Wall(Wall),
    Room(Room),
    Text(Text),
    Dimension(Dimension),
}

macro_rules! each_entity {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Entity::Line($inner) => $body,
            Entity::Circle($inner) => $body,
            Entity::Arc($inner) => $body,
            Entity::Rectangle($inner) => $body,
            Entity::Polyline($inner) => $body,
            Entity::Wall($inner) => $body,
            Entity::Room($inner) => $body,
            Entity::Text($inner) => $body,
            Entity::Dimension($inner) => $body,
        }
    };
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        self.properties().kind
    }

    /// Deep copy with a fresh identity (selection flag cleared).
    pub fn duplicate(&self) -> Entity {
        let mut copy = self.clone();
        let props = copy.properties_mut();
        props.id = Uuid::new_v4();
        props.selected = false;
        copy
    }

    pub fn as_nearest(&self) -> Option<&dyn NearestPoint> {
        match self {
            Entity::Line(e) => Some(e),
            Entity::Circle(e) => Some(e),
            Entity::Arc(e) => Some(e),
            Entity::Polyline(e) => Some(e),
            Entity::Rectangle(e) => Some(e),
            Entity::Wall(e) => Some(e),
            Entity::Dimension(e) => Some(e),
            Entity::Room(_) | Entity::Text(_) => None,
        }
    }

    pub fn as_perpendicular(&self) -> Option<&dyn PerpendicularFoot> {
        match self {
            Entity::Line(e) => Some(e),
            Entity::Polyline(e) => Some(e),
            Entity::Wall(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_filled(&self) -> Option<&dyn FilledArea> {
        match self {
            Entity::Rectangle(e) => Some(e),
            Entity::Room(e) => Some(e),
            Entity::Polyline(e) if e.is_closed() => Some(e),
            _ => None,
        }
    }

    /// Straight segments used for intersection snapping.
    pub fn straight_segments(&self) -> Vec<(Vector2, Vector2)> {
        match self {
            Entity::Line(e) => vec![(e.start(), e.end())],
            Entity::Polyline(e) => e.segments(),
            Entity::Rectangle(e) => e.edges(),
            Entity::Wall(e) => vec![(e.start(), e.end())],
            Entity::Room(e) => e.edges(),
            Entity::Circle(_) | Entity::Arc(_) | Entity::Text(_) | Entity::Dimension(_) => Vec::new(),
        }
    }

    pub fn resolved_style(&self, layer: Option<&LayerStyle>) -> ResolvedStyle {
        self.properties().resolve_style(layer)
    }

    /// Outline projected through `world_to_screen`.
    pub fn render_path(&self, world_to_screen: &dyn Fn(Vector2) -> Vector2) -> BezPath {
        let project = |p: kurbo::Point| -> kurbo::Point { world_to_screen(p.into()).into() };
        let mut out = BezPath::new();
        for el in self.to_path().elements() {
            out.push(match *el {
                PathEl::MoveTo(p) => PathEl::MoveTo(project(p)),
                PathEl::LineTo(p) => PathEl::LineTo(project(p)),
                PathEl::QuadTo(p1, p2) => PathEl::QuadTo(project(p1), project(p2)),
                PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(project(p1), project(p2), project(p3)),
                PathEl::ClosePath => PathEl::ClosePath,
            });
        }
        out
    }

    pub fn serialize(&self) -> DraftResult<EntityRecord> {
        let data = match self {
            Entity::Line(e) => serde_json::to_value(e.data())?,
            Entity::Circle(e) => serde_json::to_value(e.data())?,
            Entity::Arc(e) => serde_json::to_value(e.data())?,
            Entity::Rectangle(e) => serde_json::to_value(e.data())?,
            Entity::Polyline(e) => serde_json::to_value(e.data())?,
            Entity::Wall(e) => serde_json::to_value(e.data())?,
            Entity::Room(e) => serde_json::to_value(e.data())?,
            Entity::Text(e) => serde_json::to_value(e.data())?,
            Entity::Dimension(e) => serde_json::to_value(e.data())?,
        };
        Ok(EntityRecord {
            properties: self.properties().clone(),
            data,
        })
    }

    /// Rebuild an entity from its record. Walls resolve their type through
    /// `registry`.
    pub fn deserialize(record: EntityRecord, registry: &WallTypeRegistry) -> DraftResult<Entity> {
        let EntityRecord { properties, data } = record;
        let entity = match properties.kind {
            EntityKind::Line => Entity::Line(Line::from_data(properties, serde_json::from_value(data)?)),
            EntityKind::Circle => Entity::Circle(Circle::from_data(properties, serde_json::from_value(data)?)),
            EntityKind::Arc => Entity::Arc(Arc::from_data(properties, serde_json::from_value(data)?)),
            EntityKind::Rectangle => {
                Entity::Rectangle(Rectangle::from_data(properties, serde_json::from_value(data)?))
            }
            EntityKind::Polyline => {
                Entity::Polyline(Polyline::from_data(properties, serde_json::from_value(data)?)?)
            }
            EntityKind::Wall => {
                Entity::Wall(Wall::from_data(properties, serde_json::from_value(data)?, registry)?)
            }
            EntityKind::Room => Entity::Room(Room::from_data(properties, serde_json::from_value(data)?)),
            EntityKind::Text => Entity::Text(Text::from_data(properties, serde_json::from_value(data)?)),
            EntityKind::Dimension => {
                Entity::Dimension(Dimension::from_data(properties, serde_json::from_value(data)?))
            }
            kind @ (EntityKind::Spline | EntityKind::Point) => {
                return Err(DraftError::UnsupportedEntity(kind));
            }
        };
        Ok(entity)
    }

    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Entity::Wall(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Entity::Room(r) => Some(r),
            _ => None,
        }
    }
}

impl EntityTrait for Entity {
    fn properties(&self) -> &EntityProperties {
        each_entity!(self, e => e.properties())
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        each_entity!(self, e => e.properties_mut())
    }

    fn bounding_box(&self) -> Rect {
        each_entity!(self, e => e.bounding_box())
    }

    fn distance_to_point(&self, point: Vector2) -> f64 {
        each_entity!(self, e => e.distance_to_point(point))
    }

    fn contains_point(&self, point: Vector2, tolerance: f64) -> bool {
        each_entity!(self, e => e.contains_point(point, tolerance))
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        each_entity!(self, e => e.intersects_rectangle(min, max))
    }

    fn transform(&mut self, matrix: &Affine) {
        each_entity!(self, e => e.transform(matrix))
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        each_entity!(self, e => e.snap_points(types))
    }

    fn to_path(&self) -> BezPath {
        each_entity!(self, e => e.to_path())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Entity {
            fn from(value: $variant) -> Self {
                Entity::$variant(value)
            }
        })*
    };
}

impl_from_variant!(Line, Circle, Arc, Rectangle, Polyline, Wall, Room, Text, Dimension);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::scale;
    use crate::wall_types::WallTypeRegistry;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    fn sample_entities(registry: &WallTypeRegistry) -> Vec<Entity> {
        let wall_type = registry.get("interior-2x4").unwrap().clone();
        let mut room = Room::new(vec![v(0.0, 0.0), v(12.0, 0.0), v(12.0, 10.0), v(0.0, 10.0)], RoomType::Kitchen);
        room.set_name("Kitchen");
        vec![
            Line::new(v(0.0, 0.0), v(10.0, 5.0)).into(),
            Circle::new(v(3.0, 3.0), 2.0).into(),
            Arc::new(v(0.0, 0.0), 5.0, 0.0, std::f64::consts::PI).into(),
            Rectangle::from_corners(v(5.0, 8.0), v(1.0, 2.0)).into(),
            Polyline::new(vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0)], true).unwrap().into(),
            Wall::new(v(0.0, 0.0), v(20.0, 0.0), wall_type).into(),
            room.into(),
            Text::new(v(2.0, 2.0), "Level 1", 0.5).into(),
            Dimension::new(v(0.0, 0.0), v(10.0, 0.0), v(5.0, 2.0)).into(),
        ]
    }

    #[test]
    fn test_round_trip_every_kind() {
        let registry = WallTypeRegistry::with_defaults();
        for mut entity in sample_entities(&registry) {
            entity.properties_mut().color = Some(SerializableColor::new(200, 10, 10, 255));
            entity.properties_mut().line_type = Some(LineType::Dashed);
            let record = entity.serialize().unwrap();
            let json = serde_json::to_string(&record).unwrap();
            let parsed: EntityRecord = serde_json::from_str(&json).unwrap();
            let back = Entity::deserialize(parsed, &registry).unwrap();

            assert_eq!(back.properties(), entity.properties());
            assert_eq!(back.serialize().unwrap(), record);
            assert_eq!(back.bounding_box(), entity.bounding_box());
        }
    }

    #[test]
    fn test_properties_json_shape() {
        let line: Entity = Line::new(v(1.0, 2.0), v(3.0, 4.0)).into();
        let json = serde_json::to_value(line.serialize().unwrap()).unwrap();
        assert_eq!(json["properties"]["type"], "line");
        assert_eq!(json["properties"]["visible"], true);
        assert!(json["properties"].get("lineWeight").is_none());
        assert_eq!(json["data"]["start"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["data"]["end"], serde_json::json!([3.0, 4.0]));
    }

    #[test]
    fn test_unsupported_kind_fails() {
        let registry = WallTypeRegistry::with_defaults();
        let record = EntityRecord {
            properties: EntityProperties::new(EntityKind::Spline),
            data: serde_json::Value::Null,
        };
        assert!(matches!(
            Entity::deserialize(record, &registry),
            Err(DraftError::UnsupportedEntity(EntityKind::Spline))
        ));
    }

    #[test]
    fn test_defining_points_inside_bounds() {
        let registry = WallTypeRegistry::with_defaults();
        for entity in sample_entities(&registry) {
            let points: Vec<Vector2> = entity
                .snap_points(&[SnapType::Endpoint, SnapType::Midpoint, SnapType::Center, SnapType::Quadrant, SnapType::Node])
                .into_iter()
                .map(|s| s.point)
                .collect();
            assert!(!points.is_empty(), "{:?} has no feature points", entity.kind());
            for p in points {
                assert!(entity.is_in_bounding_box(p), "{:?}: {:?} outside bounds", entity.kind(), p);
            }
        }
    }

    #[test]
    fn test_nearest_point_matches_distance() {
        let registry = WallTypeRegistry::with_defaults();
        let samples = [v(-3.0, 7.0), v(4.0, 1.0), v(25.0, -2.0), v(6.0, 6.0)];
        for entity in sample_entities(&registry) {
            let Some(nearest) = entity.as_nearest() else { continue };
            for p in samples {
                let d = entity.distance_to_point(p);
                let n = nearest.nearest_point(p);
                assert!((d - p.distance_to(n)).abs() < 1e-9, "{:?} at {:?}", entity.kind(), p);
            }
        }
    }

    #[test]
    fn test_scaled_bounds_are_consistent() {
        let mut rect: Entity = Rectangle::from_corners(v(1.0, 1.0), v(3.0, 2.0)).into();
        let before = rect.bounding_box();
        rect.transform(&scale(2.0, 3.0));
        let after = rect.bounding_box();
        assert_eq!(after, kurbo::Rect::new(before.x0 * 2.0, before.y0 * 3.0, before.x1 * 2.0, before.y1 * 3.0));

        // Averaged radius: the circle box stays a square covering the shorter axis.
        let mut circle: Entity = Circle::new(v(0.0, 0.0), 1.0).into();
        circle.transform(&scale(2.0, 4.0));
        let b = circle.bounding_box();
        assert!((b.width() - 6.0).abs() < 1e-9);
        assert!(b.width() >= 2.0 * 2.0);
    }

    #[test]
    fn test_duplicate_gets_new_identity() {
        let mut line: Entity = Line::new(v(0.0, 0.0), v(1.0, 1.0)).into();
        line.properties_mut().selected = true;
        let copy = line.duplicate();
        assert_ne!(copy.id(), line.id());
        assert!(!copy.properties().selected);
        assert_eq!(copy.bounding_box(), line.bounding_box());
    }

    #[test]
    fn test_style_resolution_prefers_entity_override() {
        let mut props = EntityProperties::new(EntityKind::Line);
        let layer = LayerStyle {
            color: SerializableColor::new(0, 0, 255, 255),
            line_weight: 0.5,
            line_type: LineType::Hidden,
        };
        let resolved = props.resolve_style(Some(&layer));
        assert_eq!(resolved.line_type, LineType::Hidden);
        assert_eq!(resolved.line_weight, 0.5);

        props.line_weight = Some(1.0);
        props.line_type = Some(LineType::Dotted);
        let resolved = props.resolve_style(Some(&layer));
        assert_eq!(resolved.line_type, LineType::Dotted);
        assert_eq!(resolved.line_weight, 1.0);
    }

    #[test]
    fn test_render_path_projects_points() {
        let line: Entity = Line::new(v(1.0, 1.0), v(2.0, 3.0)).into();
        let path = line.render_path(&|p| p * 10.0);
        let elements: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(elements[0], PathEl::MoveTo(kurbo::Point::new(10.0, 10.0)));
        assert_eq!(elements[1], PathEl::LineTo(kurbo::Point::new(20.0, 30.0)));
    }
}
