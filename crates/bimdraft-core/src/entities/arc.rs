//! Circular arc entity.

use super::{BoundsCache, EntityKind, EntityProperties, EntityTrait, NearestPoint, push_snap};
use crate::geometry::{
    EPSILON, Vector2, average_scale, bounds_of, is_mirroring, rotation_angle,
    segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Flattening resolution used for window selection.
const SELECTION_SEGMENTS: usize = 32;

/// A circular arc swept counter-clockwise from `start_angle` to `end_angle`.
#[derive(Debug, Clone)]
pub struct Arc {
    props: EntityProperties,
    center: Vector2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArcData {
    center: Vector2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Create a new arc. Angles are in radians.
    pub fn new(center: Vector2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            props: EntityProperties::new(EntityKind::Arc),
            center,
            radius: radius.max(0.0),
            start_angle,
            end_angle,
            bounds: BoundsCache::default(),
        }
    }

    /// Arc from `p1` to `p3` passing through `p2`. `None` when the points
    /// are colinear.
    pub fn through_points(p1: Vector2, p2: Vector2, p3: Vector2) -> Option<Self> {
        let d = 2.0 * (p2 - p1).cross(p3 - p1);
        if d.abs() < EPSILON {
            return None;
        }
        let b = p2 - p1;
        let c = p3 - p1;
        let ux = (c.y * b.length_squared() - b.y * c.length_squared()) / d;
        let uy = (b.x * c.length_squared() - c.x * b.length_squared()) / d;
        let center = p1 + Vector2::new(ux, uy);
        let radius = center.distance_to(p1);

        let a1 = (p1 - center).angle();
        let a2 = (p2 - center).angle();
        let a3 = (p3 - center).angle();
        let passes_ccw = (a2 - a1).rem_euclid(TAU) <= (a3 - a1).rem_euclid(TAU);
        Some(if passes_ccw {
            Self::new(center, radius, a1, a3)
        } else {
            Self::new(center, radius, a3, a1)
        })
    }

    pub(crate) fn from_data(props: EntityProperties, data: ArcData) -> Self {
        Self {
            props,
            center: data.center,
            radius: data.radius.max(0.0),
            start_angle: data.start_angle,
            end_angle: data.end_angle,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn data(&self) -> ArcData {
        ArcData {
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }
    }

    pub fn center(&self) -> Vector2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn set_center(&mut self, center: Vector2) {
        self.center = center;
        self.bounds.invalidate();
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
        self.bounds.invalidate();
    }

    pub fn set_angles(&mut self, start_angle: f64, end_angle: f64) {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self.bounds.invalidate();
    }

    /// Counter-clockwise sweep in `[0, 2π)`.
    pub fn sweep(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(TAU)
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }

    pub fn start_point(&self) -> Vector2 {
        Vector2::polar(self.center, self.radius, self.start_angle)
    }

    pub fn end_point(&self) -> Vector2 {
        Vector2::polar(self.center, self.radius, self.end_angle)
    }

    /// Point halfway along the sweep.
    pub fn mid_point(&self) -> Vector2 {
        Vector2::polar(self.center, self.radius, self.start_angle + self.sweep() / 2.0)
    }

    /// Whether the direction `angle` falls inside the sweep.
    pub fn contains_angle(&self, angle: f64) -> bool {
        (angle - self.start_angle).rem_euclid(TAU) <= self.sweep() + EPSILON
    }

    fn quadrants_in_sweep(&self) -> Vec<Vector2> {
        (0..4)
            .map(|i| i as f64 * FRAC_PI_2)
            .filter(|&a| self.contains_angle(a))
            .map(|a| Vector2::polar(self.center, self.radius, a))
            .collect()
    }

    fn flattened(&self) -> Vec<(Vector2, Vector2)> {
        let sweep = self.sweep();
        let points: Vec<Vector2> = (0..=SELECTION_SEGMENTS)
            .map(|i| {
                let t = i as f64 / SELECTION_SEGMENTS as f64;
                Vector2::polar(self.center, self.radius, self.start_angle + sweep * t)
            })
            .collect();
        points.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

impl EntityTrait for Arc {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| {
            let mut points = vec![self.start_point(), self.end_point()];
            points.extend(self.quadrants_in_sweep());
            bounds_of(&points)
        })
    }

    fn distance_to_point(&self, point: Vector2) -> f64 {
        point.distance_to(self.nearest_point(point))
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&self.flattened(), min, max)
    }

    fn transform(&mut self, matrix: &Affine) {
        let theta = rotation_angle(matrix);
        self.center = self.center.transform(matrix);
        self.radius *= average_scale(matrix);
        if is_mirroring(matrix) {
            let (start, end) = (self.start_angle, self.end_angle);
            self.start_angle = theta - end;
            self.end_angle = theta - start;
        } else {
            self.start_angle += theta;
            self.end_angle += theta;
        }
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        let id = self.props.id;
        push_snap(&mut out, types, SnapType::Endpoint, id, [self.start_point(), self.end_point()]);
        push_snap(&mut out, types, SnapType::Midpoint, id, [self.mid_point()]);
        push_snap(&mut out, types, SnapType::Center, id, [self.center]);
        if self.radius > 0.0 {
            push_snap(&mut out, types, SnapType::Quadrant, id, self.quadrants_in_sweep());
        }
        out
    }

    fn to_path(&self) -> BezPath {
        kurbo::Arc {
            center: self.center.into(),
            radii: Vec2::new(self.radius, self.radius),
            start_angle: self.start_angle,
            sweep_angle: self.sweep(),
            x_rotation: 0.0,
        }
        .to_path(0.1)
    }
}

impl NearestPoint for Arc {
    /// Radial projection inside the sweep, otherwise the closer endpoint.
    fn nearest_point(&self, point: Vector2) -> Vector2 {
        let dir = point - self.center;
        if dir.length_squared() < f64::EPSILON {
            return self.mid_point();
        }
        if self.contains_angle(dir.angle()) {
            return self.center + dir.normalized() * self.radius;
        }
        let (start, end) = (self.start_point(), self.end_point());
        if point.distance_to(start) <= point.distance_to(end) { start } else { end }
    }
}
