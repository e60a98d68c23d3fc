//! Room entity: a closed boundary with derived area data.

use super::{BoundsCache, EntityKind, EntityProperties, EntityTrait, FilledArea, push_snap};
use crate::geometry::{
    Vector2, bounds_of, chain_segments, distance_to_segment, point_in_polygon, polygon_area,
    polygon_centroid, polygon_perimeter, segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};

/// Default ceiling height in drawing units (feet).
pub const DEFAULT_CEILING_HEIGHT: f64 = 8.0;

/// Occupancy of a room. Drives the default finish schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomType {
    Bedroom,
    Bathroom,
    Kitchen,
    LivingRoom,
    DiningRoom,
    Office,
    Corridor,
    Storage,
    Utility,
    Garage,
    #[default]
    Other,
}

/// Surface finishes of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomFinishes {
    pub floor: String,
    pub walls: String,
    pub ceiling: String,
    pub base: String,
}

impl RoomFinishes {
    fn of(floor: &str, walls: &str, ceiling: &str, base: &str) -> Self {
        Self {
            floor: floor.to_string(),
            walls: walls.to_string(),
            ceiling: ceiling.to_string(),
            base: base.to_string(),
        }
    }
}

impl RoomType {
    /// Stock finish schedule for this room type.
    pub fn default_finishes(self) -> RoomFinishes {
        match self {
            RoomType::Bedroom => RoomFinishes::of("Carpet", "Painted Gypsum", "Painted Gypsum", "Wood Base"),
            RoomType::Bathroom => RoomFinishes::of("Ceramic Tile", "Ceramic Tile", "Moisture Resistant Gypsum", "Tile Base"),
            RoomType::Kitchen => RoomFinishes::of("Vinyl Plank", "Painted Gypsum", "Painted Gypsum", "Vinyl Base"),
            RoomType::LivingRoom | RoomType::DiningRoom => {
                RoomFinishes::of("Hardwood", "Painted Gypsum", "Painted Gypsum", "Wood Base")
            }
            RoomType::Office => RoomFinishes::of("Carpet Tile", "Painted Gypsum", "Acoustic Tile", "Rubber Base"),
            RoomType::Corridor => RoomFinishes::of("Vinyl Tile", "Painted Gypsum", "Acoustic Tile", "Rubber Base"),
            RoomType::Storage | RoomType::Utility => {
                RoomFinishes::of("Sealed Concrete", "Painted Gypsum", "Exposed", "Rubber Base")
            }
            RoomType::Garage => RoomFinishes::of("Sealed Concrete", "Fire Rated Gypsum", "Fire Rated Gypsum", "None"),
            RoomType::Other => RoomFinishes::of("Unspecified", "Unspecified", "Unspecified", "Unspecified"),
        }
    }
}

/// Descriptive and derived room data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomProperties {
    pub name: String,
    pub number: String,
    pub room_type: RoomType,
    pub area: f64,
    pub perimeter: f64,
    pub ceiling_height: f64,
    pub finishes: RoomFinishes,
}

/// A room bounded by a closed polygon.
///
/// Area, perimeter and the label point are recomputed whenever the boundary
/// changes; the bounding box is computed lazily.
#[derive(Debug, Clone)]
pub struct Room {
    props: EntityProperties,
    boundary: Vec<Vector2>,
    room: RoomProperties,
    label_point: Vector2,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RoomData {
    boundary: Vec<Vector2>,
    properties: RoomProperties,
}

impl Room {
    pub fn new(boundary: Vec<Vector2>, room_type: RoomType) -> Self {
        let mut room = Self {
            props: EntityProperties::new(EntityKind::Room),
            boundary,
            room: RoomProperties {
                name: String::new(),
                number: String::new(),
                room_type,
                area: 0.0,
                perimeter: 0.0,
                ceiling_height: DEFAULT_CEILING_HEIGHT,
                finishes: room_type.default_finishes(),
            },
            label_point: Vector2::ZERO,
            bounds: BoundsCache::default(),
        };
        room.recompute();
        room
    }

    pub(crate) fn from_data(props: EntityProperties, data: RoomData) -> Self {
        let mut room = Self {
            props,
            boundary: data.boundary,
            room: data.properties,
            label_point: Vector2::ZERO,
            bounds: BoundsCache::default(),
        };
        room.recompute();
        room
    }

    pub(crate) fn data(&self) -> RoomData {
        RoomData {
            boundary: self.boundary.clone(),
            properties: self.room.clone(),
        }
    }

    fn recompute(&mut self) {
        self.room.area = polygon_area(&self.boundary);
        self.room.perimeter = polygon_perimeter(&self.boundary);
        self.label_point = polygon_centroid(&self.boundary);
        self.bounds.invalidate();
    }

    pub fn boundary(&self) -> &[Vector2] {
        &self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Vec<Vector2>) {
        self.boundary = boundary;
        self.recompute();
    }

    pub fn room_properties(&self) -> &RoomProperties {
        &self.room
    }

    pub fn area(&self) -> f64 {
        self.room.area
    }

    pub fn perimeter(&self) -> f64 {
        self.room.perimeter
    }

    /// Where the room tag is placed.
    pub fn label_point(&self) -> Vector2 {
        self.label_point
    }

    pub fn name(&self) -> &str {
        &self.room.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.room.name = name.into();
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.room.number = number.into();
    }

    pub fn set_ceiling_height(&mut self, height: f64) {
        self.room.ceiling_height = height;
    }

    /// Changing the type also resets the finishes to that type's defaults.
    pub fn set_room_type(&mut self, room_type: RoomType) {
        self.room.room_type = room_type;
        self.room.finishes = room_type.default_finishes();
    }

    pub fn set_finishes(&mut self, finishes: RoomFinishes) {
        self.room.finishes = finishes;
    }

    pub fn edges(&self) -> Vec<(Vector2, Vector2)> {
        chain_segments(&self.boundary, true)
    }

    fn distance_to_boundary(&self, point: Vector2) -> f64 {
        self.edges()
            .into_iter()
            .map(|(a, b)| distance_to_segment(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }
}

impl EntityTrait for Room {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| bounds_of(&self.boundary))
    }

    /// Distance to the boundary outline.
    fn distance_to_point(&self, point: Vector2) -> f64 {
        self.distance_to_boundary(point)
    }

    /// Rooms are picked anywhere inside or near the outline.
    fn contains_point(&self, point: Vector2, tolerance: f64) -> bool {
        self.contains_point_inside(point) || self.distance_to_boundary(point) <= tolerance
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&self.edges(), min, max)
    }

    fn transform(&mut self, matrix: &Affine) {
        for p in &mut self.boundary {
            *p = p.transform(matrix);
        }
        self.recompute();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Endpoint, id, self.boundary.iter().copied());
        push_snap(
            &mut out,
            types,
            SnapType::Midpoint,
            id,
            self.edges().into_iter().map(|(a, b)| Vector2::midpoint(a, b)),
        );
        push_snap(&mut out, types, SnapType::Center, id, [self.label_point]);
        out
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((first, rest)) = self.boundary.split_first() else {
            return path;
        };
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
        path
    }
}

impl FilledArea for Room {
    fn contains_point_inside(&self, point: Vector2) -> bool {
        point_in_polygon(point, &self.boundary)
    }
}
