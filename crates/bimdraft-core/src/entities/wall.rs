//! Wall entity: a thick centerline with a resolved assembly type.

use super::{
    BoundsCache, EntityId, EntityKind, EntityProperties, EntityTrait, NearestPoint,
    PerpendicularFoot, push_snap,
};
use crate::error::DraftResult;
use crate::geometry::{Vector2, bounds_of, chain_segments, project_onto_line, segments_intersect_rect};
use crate::snap::{SnapPoint, SnapType};
use crate::wall_types::{WallType, WallTypeRegistry};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Distance under which two wall ends count as joined.
pub const DEFAULT_CORNER_TOLERANCE: f64 = 0.01;

/// A wall between two centerline points.
#[derive(Debug, Clone)]
pub struct Wall {
    props: EntityProperties,
    start: Vector2,
    end: Vector2,
    wall_type: WallType,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WallData {
    start: Vector2,
    end: Vector2,
    wall_type_id: String,
}

impl Wall {
    pub fn new(start: Vector2, end: Vector2, wall_type: WallType) -> Self {
        Self {
            props: EntityProperties::new(EntityKind::Wall),
            start,
            end,
            wall_type,
            bounds: BoundsCache::default(),
        }
    }

    /// Build a wall whose type is looked up by id.
    pub fn with_type_id(
        start: Vector2,
        end: Vector2,
        wall_type_id: &str,
        registry: &WallTypeRegistry,
    ) -> DraftResult<Self> {
        Ok(Self::new(start, end, registry.get(wall_type_id)?.clone()))
    }

    pub(crate) fn from_data(
        props: EntityProperties,
        data: WallData,
        registry: &WallTypeRegistry,
    ) -> DraftResult<Self> {
        let wall_type = registry.get(&data.wall_type_id)?.clone();
        Ok(Self {
            props,
            start: data.start,
            end: data.end,
            wall_type,
            bounds: BoundsCache::default(),
        })
    }

    pub(crate) fn data(&self) -> WallData {
        WallData {
            start: self.start,
            end: self.end,
            wall_type_id: self.wall_type.id.clone(),
        }
    }

    pub fn start(&self) -> Vector2 {
        self.start
    }

    pub fn end(&self) -> Vector2 {
        self.end
    }

    pub fn wall_type(&self) -> &WallType {
        &self.wall_type
    }

    pub fn set_points(&mut self, start: Vector2, end: Vector2) {
        self.start = start;
        self.end = end;
        self.bounds.invalidate();
    }

    pub fn set_wall_type(&mut self, wall_type: WallType) {
        self.wall_type = wall_type;
        self.bounds.invalidate();
    }

    /// Assembly thickness in drawing units.
    pub fn thickness(&self) -> f64 {
        self.wall_type.thickness()
    }

    /// Centerline length.
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    pub fn midpoint(&self) -> Vector2 {
        Vector2::midpoint(self.start, self.end)
    }

    /// Unit left-hand normal of the centerline (zero when degenerate).
    pub fn normal(&self) -> Vector2 {
        (self.end - self.start).normalized().perpendicular()
    }

    /// Body outline: start-left, end-left, end-right, start-right.
    pub fn outline(&self) -> [Vector2; 4] {
        let offset = self.normal() * (self.thickness() / 2.0);
        [
            self.start + offset,
            self.end + offset,
            self.end - offset,
            self.start - offset,
        ]
    }

    /// Pairwise end comparison over a batch of walls. Quadratic in the
    /// number of walls.
    pub fn detect_corners<'a>(walls: impl IntoIterator<Item = &'a Wall>, tolerance: f64) -> WallCornerTable {
        let walls: Vec<&Wall> = walls.into_iter().collect();
        let mut table = WallCornerTable::default();
        for wall in &walls {
            table.ends.insert(wall.id(), WallEnds::default());
        }
        for (i, a) in walls.iter().enumerate() {
            for b in &walls[i + 1..] {
                let pairs = [
                    (a.start, b.start, true, true),
                    (a.start, b.end, true, false),
                    (a.end, b.start, false, true),
                    (a.end, b.end, false, false),
                ];
                for (pa, pb, a_start, b_start) in pairs {
                    if pa.distance_to(pb) <= tolerance {
                        table.mark(a.id(), a_start);
                        table.mark(b.id(), b_start);
                    }
                }
            }
        }
        table
    }
}

impl EntityTrait for Wall {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| bounds_of(&self.outline()))
    }

    /// Distance to the wall body; zero inside it.
    fn distance_to_point(&self, point: Vector2) -> f64 {
        point.distance_to(self.nearest_point(point))
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&chain_segments(&self.outline(), true), min, max)
    }

    fn transform(&mut self, matrix: &Affine) {
        self.start = self.start.transform(matrix);
        self.end = self.end.transform(matrix);
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Endpoint, id, [self.start, self.end]);
        push_snap(&mut out, types, SnapType::Midpoint, id, [self.midpoint()]);
        out
    }

    fn to_path(&self) -> BezPath {
        let outline = self.outline();
        let mut path = BezPath::new();
        path.move_to(outline[0]);
        for p in &outline[1..] {
            path.line_to(*p);
        }
        path.close_path();
        path
    }
}

impl NearestPoint for Wall {
    /// Closest point of the rectangular body, clamped along and across the
    /// centerline.
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        let axis = self.end - self.start;
        let length = axis.length();
        if length < f64::EPSILON {
            return self.start;
        }
        let along = axis / length;
        let across = along.perpendicular();
        let half = self.thickness() / 2.0;
        let rel = point - self.start;
        let u = rel.dot(along).clamp(0.0, length);
        let v = rel.dot(across).clamp(-half, half);
        self.start + along * u + across * v
    }
}

impl PerpendicularFoot for Wall {
    fn perpendicular_foot(&self, from: Vector2) -> Option<Vector2> {
        project_onto_line(from, self.start, self.end)
            .filter(|(_, t)| (0.0..=1.0).contains(t))
            .map(|(foot, _)| foot)
    }
}

/// Which ends of one wall touch another wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallEnds {
    pub start: bool,
    pub end: bool,
}

/// Result of a corner detection pass, keyed by wall id.
#[derive(Debug, Clone, Default)]
pub struct WallCornerTable {
    ends: HashMap<EntityId, WallEnds>,
}

impl WallCornerTable {
    fn mark(&mut self, id: EntityId, start: bool) {
        let ends = self.ends.entry(id).or_default();
        if start {
            ends.start = true;
        } else {
            ends.end = true;
        }
    }

    /// Joined ends of a wall; unknown ids report nothing joined.
    pub fn get(&self, id: EntityId) -> WallEnds {
        self.ends.get(&id).copied().unwrap_or_default()
    }

    pub fn connected_end_count(&self) -> usize {
        self.ends
            .values()
            .map(|e| usize::from(e.start) + usize::from(e.end))
            .sum()
    }

    /// Free ends across all walls in the batch.
    pub fn unjoined_end_count(&self) -> usize {
        self.ends.len() * 2 - self.connected_end_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &WallEnds)> {
        self.ends.iter()
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }
}
