//! Axis-aligned rectangle entity.

use super::{BoundsCache, EntityKind, EntityProperties, EntityTrait, FilledArea, NearestPoint, push_snap};
use crate::geometry::{
    Vector2, bounds_of, chain_segments, distance_to_segment, nearest_point_on_segment,
    rect_contains_inclusive, segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle stored as normalized min/max corners.
#[derive(Debug, Clone)]
pub struct Rectangle {
    props: EntityProperties,
    min: Vector2,
    max: Vector2,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RectangleData {
    min: Vector2,
    max: Vector2,
}

fn normalize_corners(a: Vector2, b: Vector2) -> (Vector2, Vector2) {
    (
        Vector2::new(a.x.min(b.x), a.y.min(b.y)),
        Vector2::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

impl Rectangle {
    /// Create a rectangle from any two opposite corners.
    pub fn from_corners(a: Vector2, b: Vector2) -> Self {
        let (min, max) = normalize_corners(a, b);
        Self {
            props: EntityProperties::new(EntityKind::Rectangle),
            min,
            max,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn from_data(props: EntityProperties, data: RectangleData) -> Self {
        let (min, max) = normalize_corners(data.min, data.max);
        Self {
            props,
            min,
            max,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn data(&self) -> RectangleData {
        RectangleData {
            min: self.min,
            max: self.max,
        }
    }

    pub fn min(&self) -> Vector2 {
        self.min
    }

    pub fn max(&self) -> Vector2 {
        self.max
    }

    pub fn set_corners(&mut self, a: Vector2, b: Vector2) {
        (self.min, self.max) = normalize_corners(a, b);
        self.bounds.invalidate();
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Vector2 {
        Vector2::midpoint(self.min, self.max)
    }

    /// Corners counter-clockwise starting at `min`.
    pub fn corners(&self) -> [Vector2; 4] {
        [
            self.min,
            Vector2::new(self.max.x, self.min.y),
            self.max,
            Vector2::new(self.min.x, self.max.y),
        ]
    }

    /// The four edges in corner order.
    pub fn edges(&self) -> Vec<(Vector2, Vector2)> {
        chain_segments(&self.corners(), true)
    }
}

impl EntityTrait for Rectangle {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds
            .get_or_compute(|| Rect::new(self.min.x, self.min.y, self.max.x, self.max.y))
    }

    /// Distance to the outline.
    fn distance_to_point(&self, point: Vector2) -> f64 {
        self.edges()
            .into_iter()
            .map(|(a, b)| distance_to_segment(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&self.edges(), min, max)
    }

    /// Rotations collapse to the axis-aligned hull of the moved corners.
    fn transform(&mut self, matrix: &Affine) {
        let moved: Vec<Vector2> = self.corners().iter().map(|c| c.transform(matrix)).collect();
        let hull = bounds_of(&moved);
        self.min = Vector2::new(hull.x0, hull.y0);
        self.max = Vector2::new(hull.x1, hull.y1);
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Endpoint, id, self.corners());
        push_snap(
            &mut out,
            types,
            SnapType::Midpoint,
            id,
            self.edges().into_iter().map(|(a, b)| Vector2::midpoint(a, b)),
        );
        push_snap(&mut out, types, SnapType::Center, id, [self.center()]);
        out
    }

    fn to_path(&self) -> BezPath {
        let corners = self.corners();
        let mut path = BezPath::new();
        path.move_to(corners[0]);
        for c in &corners[1..] {
            path.line_to(*c);
        }
        path.close_path();
        path
    }
}

impl NearestPoint for Rectangle {
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        self.edges()
            .into_iter()
            .map(|(a, b)| nearest_point_on_segment(point, a, b))
            .min_by(|p, q| point.distance_to(*p).total_cmp(&point.distance_to(*q)))
            .unwrap_or(self.min)
    }
}

impl FilledArea for Rectangle {
    fn contains_point_inside(&self, point: Vector2) -> bool {
        rect_contains_inclusive(self.bounding_box(), point)
    }
}
