//! Line entity.

use super::{
    BoundsCache, EntityKind, EntityProperties, EntityTrait, NearestPoint, PerpendicularFoot,
    push_snap,
};
use crate::geometry::{
    Vector2, bounds_of, distance_to_segment, nearest_point_on_segment, project_onto_line,
    segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};

/// A straight segment between two points.
#[derive(Debug, Clone)]
pub struct Line {
    props: EntityProperties,
    start: Vector2,
    end: Vector2,
    bounds: BoundsCache,
}

/// Persisted geometry of a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LineData {
    start: Vector2,
    end: Vector2,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Self {
            props: EntityProperties::new(EntityKind::Line),
            start,
            end,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn from_data(props: EntityProperties, data: LineData) -> Self {
        Self {
            props,
            start: data.start,
            end: data.end,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn data(&self) -> LineData {
        LineData {
            start: self.start,
            end: self.end,
        }
    }

    pub fn start(&self) -> Vector2 {
        self.start
    }

    pub fn end(&self) -> Vector2 {
        self.end
    }

    pub fn set_start(&mut self, start: Vector2) {
        self.start = start;
        self.bounds.invalidate();
    }

    pub fn set_end(&mut self, end: Vector2) {
        self.end = end;
        self.bounds.invalidate();
    }

    pub fn set_points(&mut self, start: Vector2, end: Vector2) {
        self.start = start;
        self.end = end;
        self.bounds.invalidate();
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Vector2 {
        Vector2::midpoint(self.start, self.end)
    }

    /// Unit direction from start to end (zero for a degenerate line).
    pub fn direction(&self) -> Vector2 {
        (self.end - self.start).normalized()
    }
}

impl EntityTrait for Line {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| bounds_of(&[self.start, self.end]))
    }

    fn distance_to_point(&self, point: Vector2) -> f64 {
        distance_to_segment(point, self.start, self.end)
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&[(self.start, self.end)], min, max)
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
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }
}

impl NearestPoint for Line {
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        nearest_point_on_segment(point, self.start, self.end)
    }
}

impl PerpendicularFoot for Line {
    fn perpendicular_foot(&self, from: Vector2) -> Option<Vector2> {
        project_onto_line(from, self.start, self.end)
            .filter(|(_, t)| (0.0..=1.0).contains(t))
            .map(|(foot, _)| foot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::translation;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    #[test]
    fn test_line_creation() {
        let line = Line::new(v(0.0, 0.0), v(100.0, 0.0));
        assert!((line.length() - 100.0).abs() < f64::EPSILON);
        assert_eq!(line.properties().kind, EntityKind::Line);
    }

    #[test]
    fn test_midpoint() {
        let line = Line::new(v(0.0, 0.0), v(100.0, 100.0));
        assert_eq!(line.midpoint(), v(50.0, 50.0));
    }

    #[test]
    fn test_contains_point_matches_distance() {
        let line = Line::new(v(0.0, 0.0), v(100.0, 0.0));
        assert!(line.contains_point(v(50.0, 0.0), 1.0));
        assert!(line.contains_point(v(50.0, 2.0), 5.0));
        assert!(!line.contains_point(v(50.0, 20.0), 5.0));
        assert!(line.contains_point(v(100.0, 0.0), 0.0));
    }

    #[test]
    fn test_bounds() {
        let line = Line::new(v(10.0, 20.0), v(50.0, 80.0));
        assert_eq!(line.bounding_box(), Rect::new(10.0, 20.0, 50.0, 80.0));
    }

    #[test]
    fn test_setter_invalidates_bounds() {
        let mut line = Line::new(v(0.0, 0.0), v(1.0, 1.0));
        assert_eq!(line.bounding_box(), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(!line.bounds.is_dirty());
        line.set_end(v(5.0, -2.0));
        assert!(line.bounds.is_dirty());
        assert_eq!(line.bounding_box(), Rect::new(0.0, -2.0, 5.0, 1.0));
    }

    #[test]
    fn test_transform_invalidates_bounds() {
        let mut line = Line::new(v(0.0, 0.0), v(1.0, 1.0));
        let _ = line.bounding_box();
        line.transform(&translation(v(10.0, 0.0)));
        assert_eq!(line.bounding_box(), Rect::new(10.0, 0.0, 11.0, 1.0));
    }

    #[test]
    fn test_perpendicular_foot_inside_segment_only() {
        let line = Line::new(v(0.0, 0.0), v(10.0, 0.0));
        assert_eq!(line.perpendicular_foot(v(4.0, 7.0)), Some(v(4.0, 0.0)));
        assert_eq!(line.perpendicular_foot(v(14.0, 7.0)), None);
    }

    #[test]
    fn test_snap_points_filtered_by_type() {
        let line = Line::new(v(0.0, 0.0), v(10.0, 0.0));
        assert_eq!(line.snap_points(&[SnapType::Endpoint]).len(), 2);
        let mids = line.snap_points(&[SnapType::Midpoint]);
        assert_eq!(mids.len(), 1);
        assert_eq!(mids[0].point, v(5.0, 0.0));
        assert!(line.snap_points(&[SnapType::Center]).is_empty());
    }

    #[test]
    fn test_window_selection() {
        let line = Line::new(v(-5.0, 5.0), v(15.0, 5.0));
        assert!(line.intersects_rectangle(v(0.0, 0.0), v(10.0, 10.0)));
        assert!(!line.intersects_rectangle(v(0.0, 6.0), v(10.0, 10.0)));
    }
}
