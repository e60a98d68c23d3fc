//! Dimension annotation.

use super::{BoundsCache, EntityKind, EntityProperties, EntityTrait, NearestPoint, push_snap};
use crate::geometry::{
    Vector2, average_scale, bounds_of, distance_to_segment, nearest_point_on_segment,
    segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionType {
    #[default]
    Linear,
    Aligned,
    Angular,
    Radial,
    Diameter,
}

/// Measures the distance between two points. The dimension line runs
/// parallel to `start → end` through the text position.
#[derive(Debug, Clone)]
pub struct Dimension {
    props: EntityProperties,
    start: Vector2,
    end: Vector2,
    text_position: Vector2,
    dimension_type: DimensionType,
    text_override: Option<String>,
    arrow_size: f64,
    text_height: f64,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DimensionData {
    start: Vector2,
    end: Vector2,
    text_position: Vector2,
    dimension_type: DimensionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_override: Option<String>,
    arrow_size: f64,
    text_height: f64,
}

impl Dimension {
    pub fn new(start: Vector2, end: Vector2, text_position: Vector2) -> Self {
        Self {
            props: EntityProperties::new(EntityKind::Dimension),
            start,
            end,
            text_position,
            dimension_type: DimensionType::Linear,
            text_override: None,
            arrow_size: 0.25,
            text_height: 0.25,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn from_data(props: EntityProperties, data: DimensionData) -> Self {
        Self {
            props,
            start: data.start,
            end: data.end,
            text_position: data.text_position,
            dimension_type: data.dimension_type,
            text_override: data.text_override,
            arrow_size: data.arrow_size,
            text_height: data.text_height,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn data(&self) -> DimensionData {
        DimensionData {
            start: self.start,
            end: self.end,
            text_position: self.text_position,
            dimension_type: self.dimension_type,
            text_override: self.text_override.clone(),
            arrow_size: self.arrow_size,
            text_height: self.text_height,
        }
    }

    pub fn start(&self) -> Vector2 {
        self.start
    }

    pub fn end(&self) -> Vector2 {
        self.end
    }

    pub fn text_position(&self) -> Vector2 {
        self.text_position
    }

    pub fn dimension_type(&self) -> DimensionType {
        self.dimension_type
    }

    pub fn arrow_size(&self) -> f64 {
        self.arrow_size
    }

    pub fn text_height(&self) -> f64 {
        self.text_height
    }

    pub fn text_override(&self) -> Option<&str> {
        self.text_override.as_deref()
    }

    pub fn set_points(&mut self, start: Vector2, end: Vector2, text_position: Vector2) {
        self.start = start;
        self.end = end;
        self.text_position = text_position;
        self.bounds.invalidate();
    }

    pub fn set_dimension_type(&mut self, dimension_type: DimensionType) {
        self.dimension_type = dimension_type;
    }

    pub fn set_text_override(&mut self, text: Option<String>) {
        self.text_override = text;
    }

    pub fn set_arrow_size(&mut self, size: f64) {
        self.arrow_size = size;
    }

    pub fn set_text_height(&mut self, height: f64) {
        self.text_height = height;
    }

    /// Measured distance between the two origins.
    pub fn measurement(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Override text, or the measurement with two decimals.
    pub fn display_text(&self) -> String {
        match &self.text_override {
            Some(text) => text.clone(),
            None => format!("{:.2}", self.measurement()),
        }
    }

    /// End points of the dimension line.
    pub fn dimension_line(&self) -> (Vector2, Vector2) {
        let normal = (self.end - self.start).normalized().perpendicular();
        let offset = normal * (self.text_position - self.start).dot(normal);
        (self.start + offset, self.end + offset)
    }

    /// Dimension line followed by the two extension lines.
    pub fn segments(&self) -> [(Vector2, Vector2); 3] {
        let (a, b) = self.dimension_line();
        [(a, b), (self.start, a), (self.end, b)]
    }
}

impl EntityTrait for Dimension {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| {
            let (a, b) = self.dimension_line();
            bounds_of(&[self.start, self.end, a, b, self.text_position])
        })
    }

    fn distance_to_point(&self, point: Vector2) -> f64 {
        self.segments()
            .iter()
            .map(|&(a, b)| distance_to_segment(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&self.segments(), min, max)
    }

    fn transform(&mut self, matrix: &Affine) {
        self.start = self.start.transform(matrix);
        self.end = self.end.transform(matrix);
        self.text_position = self.text_position.transform(matrix);
        let factor = average_scale(matrix);
        self.arrow_size *= factor;
        self.text_height *= factor;
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Endpoint, id, [self.start, self.end]);
        push_snap(&mut out, types, SnapType::Node, id, [self.text_position]);
        out
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for (a, b) in self.segments() {
            path.move_to(a);
            path.line_to(b);
        }
        path
    }
}

impl NearestPoint for Dimension {
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        self.segments()
            .iter()
            .map(|&(a, b)| nearest_point_on_segment(point, a, b))
            .min_by(|p, q| point.distance_to(*p).total_cmp(&point.distance_to(*q)))
            .unwrap_or(self.start)
    }
}
