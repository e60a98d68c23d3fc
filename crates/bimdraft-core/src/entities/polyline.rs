//! Polyline entity: an open or closed vertex chain.

use super::{
    BoundsCache, EntityKind, EntityProperties, EntityTrait, FilledArea, NearestPoint,
    PerpendicularFoot, push_snap,
};
use crate::error::{DraftError, DraftResult};
use crate::geometry::{
    Vector2, bounds_of, chain_segments, distance_to_segment, nearest_point_on_segment,
    point_in_polygon, polygon_area, project_onto_line, segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};

/// Fewest vertices a polyline may have.
pub const MIN_VERTICES: usize = 2;

/// A chain of straight segments.
#[derive(Debug, Clone)]
pub struct Polyline {
    props: EntityProperties,
    vertices: Vec<Vector2>,
    closed: bool,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PolylineData {
    vertices: Vec<Vector2>,
    closed: bool,
}

impl Polyline {
    /// Create a polyline. Fails with fewer than two vertices.
    pub fn new(vertices: Vec<Vector2>, closed: bool) -> DraftResult<Self> {
        Self::build(EntityProperties::new(EntityKind::Polyline), vertices, closed)
    }

    fn build(props: EntityProperties, vertices: Vec<Vector2>, closed: bool) -> DraftResult<Self> {
        if vertices.len() < MIN_VERTICES {
            return Err(DraftError::PolylineTooShort {
                min: MIN_VERTICES,
                actual: vertices.len(),
            });
        }
        Ok(Self {
            props,
            vertices,
            closed,
            bounds: BoundsCache::default(),
        })
    }

    pub(crate) fn from_data(props: EntityProperties, data: PolylineData) -> DraftResult<Self> {
        Self::build(props, data.vertices, data.closed)
    }

    pub(crate) fn data(&self) -> PolylineData {
        PolylineData {
            vertices: self.vertices.clone(),
            closed: self.closed,
        }
    }

    pub fn vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
        self.bounds.invalidate();
    }

    pub fn add_vertex(&mut self, vertex: Vector2) {
        self.vertices.push(vertex);
        self.bounds.invalidate();
    }

    /// Insert before `index`; `index == len` appends.
    pub fn insert_vertex(&mut self, index: usize, vertex: Vector2) -> DraftResult<()> {
        if index > self.vertices.len() {
            return Err(DraftError::VertexIndexOutOfBounds {
                index,
                len: self.vertices.len(),
            });
        }
        self.vertices.insert(index, vertex);
        self.bounds.invalidate();
        Ok(())
    }

    pub fn update_vertex(&mut self, index: usize, vertex: Vector2) -> DraftResult<()> {
        let len = self.vertices.len();
        let slot = self
            .vertices
            .get_mut(index)
            .ok_or(DraftError::VertexIndexOutOfBounds { index, len })?;
        *slot = vertex;
        self.bounds.invalidate();
        Ok(())
    }

    /// Remove and return a vertex. Never drops below two vertices.
    pub fn remove_vertex(&mut self, index: usize) -> DraftResult<Vector2> {
        let len = self.vertices.len();
        if index >= len {
            return Err(DraftError::VertexIndexOutOfBounds { index, len });
        }
        if len <= MIN_VERTICES {
            return Err(DraftError::PolylineTooShort {
                min: MIN_VERTICES,
                actual: len - 1,
            });
        }
        let removed = self.vertices.remove(index);
        self.bounds.invalidate();
        Ok(removed)
    }

    /// `n - 1` for open chains, `n` for closed ones.
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if self.closed { n } else { n.saturating_sub(1) }
    }

    /// Segment `i` joins vertex `i` to vertex `(i + 1) mod n`.
    pub fn segments(&self) -> Vec<(Vector2, Vector2)> {
        chain_segments(&self.vertices, self.closed)
    }

    pub fn length(&self) -> f64 {
        self.segments().iter().map(|(a, b)| a.distance_to(*b)).sum()
    }

    /// Enclosed area; zero for open chains.
    pub fn area(&self) -> f64 {
        if self.closed { polygon_area(&self.vertices) } else { 0.0 }
    }
}

impl EntityTrait for Polyline {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| bounds_of(&self.vertices))
    }

    fn distance_to_point(&self, point: Vector2) -> f64 {
        self.segments()
            .into_iter()
            .map(|(a, b)| distance_to_segment(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&self.segments(), min, max)
    }

    fn transform(&mut self, matrix: &Affine) {
        for v in &mut self.vertices {
            *v = v.transform(matrix);
        }
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Endpoint, id, self.vertices.iter().copied());
        push_snap(
            &mut out,
            types,
            SnapType::Midpoint,
            id,
            self.segments().into_iter().map(|(a, b)| Vector2::midpoint(a, b)),
        );
        out
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.vertices[0]);
        for v in &self.vertices[1..] {
            path.line_to(*v);
        }
        if self.closed {
            path.close_path();
        }
        path
    }
}

impl NearestPoint for Polyline {
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        self.segments()
            .into_iter()
            .map(|(a, b)| nearest_point_on_segment(point, a, b))
            .min_by(|p, q| point.distance_to(*p).total_cmp(&point.distance_to(*q)))
            .unwrap_or(self.vertices[0])
    }
}

impl PerpendicularFoot for Polyline {
    /// Closest foot among the segments the perpendicular actually lands on.
    fn perpendicular_foot(&self, from: Vector2) -> Option<Vector2> {
        self.segments()
            .into_iter()
            .filter_map(|(a, b)| project_onto_line(from, a, b))
            .filter(|(_, t)| (0.0..=1.0).contains(t))
            .map(|(foot, _)| foot)
            .min_by(|p, q| from.distance_to(*p).total_cmp(&from.distance_to(*q)))
    }
}

impl FilledArea for Polyline {
    fn contains_point_inside(&self, point: Vector2) -> bool {
        self.closed && point_in_polygon(point, &self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    fn square() -> Polyline {
        Polyline::new(vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)], true).unwrap()
    }

    #[test]
    fn test_requires_two_vertices() {
        assert!(matches!(
            Polyline::new(vec![v(0.0, 0.0)], false),
            Err(DraftError::PolylineTooShort { min: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_segment_count() {
        let mut poly = square();
        assert_eq!(poly.segment_count(), 4);
        poly.set_closed(false);
        assert_eq!(poly.segment_count(), 3);
        assert_eq!(poly.segments()[2], (v(10.0, 10.0), v(0.0, 10.0)));
    }

    #[test]
    fn test_remove_vertex_floor() {
        let mut poly = Polyline::new(vec![v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)], false).unwrap();
        assert_eq!(poly.remove_vertex(1).unwrap(), v(1.0, 0.0));
        assert!(matches!(poly.remove_vertex(0), Err(DraftError::PolylineTooShort { .. })));
        assert!(matches!(
            poly.remove_vertex(5),
            Err(DraftError::VertexIndexOutOfBounds { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_update_vertex_bounds_checked() {
        let mut poly = square();
        let _ = poly.bounding_box();
        poly.update_vertex(2, v(20.0, 20.0)).unwrap();
        assert_eq!(poly.bounding_box(), Rect::new(0.0, 0.0, 20.0, 20.0));
        assert!(poly.update_vertex(4, v(0.0, 0.0)).is_err());
        assert!(poly.insert_vertex(5, v(0.0, 0.0)).is_err());
        poly.insert_vertex(4, v(-1.0, 5.0)).unwrap();
        assert_eq!(poly.vertex_count(), 5);
    }

    #[test]
    fn test_inside_versus_near() {
        let poly = square();
        assert!(poly.contains_point_inside(v(5.0, 5.0)));
        assert!(!poly.contains_point(v(5.0, 5.0), 1.0));
        assert!(poly.contains_point(v(5.0, 0.5), 1.0));

        let mut open = square();
        open.set_closed(false);
        assert!(!open.contains_point_inside(v(5.0, 5.0)));
    }

    #[test]
    fn test_surrounding_shape_detected_by_edge_crossing() {
        let poly = Polyline::new(vec![v(-10.0, 5.0), v(20.0, 5.0)], false).unwrap();
        assert!(poly.intersects_rectangle(v(0.0, 0.0), v(10.0, 10.0)));
    }

    #[test]
    fn test_perpendicular_foot_picks_closest_segment() {
        let poly = Polyline::new(vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0)], false).unwrap();
        assert_eq!(poly.perpendicular_foot(v(8.0, 3.0)), Some(v(10.0, 3.0)));
        assert_eq!(poly.perpendicular_foot(v(3.0, -4.0)), Some(v(3.0, 0.0)));
    }
}
