//! Circle entity.

use super::{BoundsCache, EntityKind, EntityProperties, EntityTrait, NearestPoint, push_snap};
use crate::geometry::{Vector2, average_scale};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle given by center and radius.
#[derive(Debug, Clone)]
pub struct Circle {
    props: EntityProperties,
    center: Vector2,
    radius: f64,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CircleData {
    center: Vector2,
    radius: f64,
}

impl Circle {
    /// Create a new circle. Negative radii are clamped to zero.
    pub fn new(center: Vector2, radius: f64) -> Self {
        Self {
            props: EntityProperties::new(EntityKind::Circle),
            center,
            radius: radius.max(0.0),
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn from_data(props: EntityProperties, data: CircleData) -> Self {
        Self {
            props,
            center: data.center,
            radius: data.radius.max(0.0),
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn data(&self) -> CircleData {
        CircleData {
            center: self.center,
            radius: self.radius,
        }
    }

    pub fn center(&self) -> Vector2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_center(&mut self, center: Vector2) {
        self.center = center;
        self.bounds.invalidate();
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
        self.bounds.invalidate();
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    pub fn circumference(&self) -> f64 {
        std::f64::consts::TAU * self.radius
    }

    /// Points at 0°, 90°, 180° and 270°.
    pub fn quadrant_points(&self) -> [Vector2; 4] {
        let (c, r) = (self.center, self.radius);
        [
            Vector2::new(c.x + r, c.y),
            Vector2::new(c.x, c.y + r),
            Vector2::new(c.x - r, c.y),
            Vector2::new(c.x, c.y - r),
        ]
    }
}

impl EntityTrait for Circle {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| {
            Rect::new(
                self.center.x - self.radius,
                self.center.y - self.radius,
                self.center.x + self.radius,
                self.center.y + self.radius,
            )
        })
    }

    /// Distance to the circumference.
    fn distance_to_point(&self, point: Vector2) -> f64 {
        (self.center.distance_to(point) - self.radius).abs()
    }

    /// The circle crosses the window when the window holds points both
    /// inside and outside the circumference.
    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        let closest = Vector2::new(self.center.x.clamp(min.x, max.x), self.center.y.clamp(min.y, max.y));
        if closest.distance_to(self.center) > self.radius {
            return false;
        }
        let far_x = if (self.center.x - min.x).abs() > (self.center.x - max.x).abs() { min.x } else { max.x };
        let far_y = if (self.center.y - min.y).abs() > (self.center.y - max.y).abs() { min.y } else { max.y };
        Vector2::new(far_x, far_y).distance_to(self.center) >= self.radius
    }

    /// Non-uniform scales keep the shape a circle, using the average of the
    /// two axis scales for the radius.
    fn transform(&mut self, matrix: &Affine) {
        self.center = self.center.transform(matrix);
        self.radius *= average_scale(matrix);
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Center, id, [self.center]);
        if self.radius > 0.0 {
            push_snap(&mut out, types, SnapType::Quadrant, id, self.quadrant_points());
        }
        out
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }
}

impl NearestPoint for Circle {
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        let dir = point - self.center;
        if dir.length_squared() < f64::EPSILON {
            return Vector2::new(self.center.x + self.radius, self.center.y);
        }
        self.center + dir.normalized() * self.radius
    }
}
