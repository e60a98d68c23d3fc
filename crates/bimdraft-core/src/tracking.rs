//! Polar tracking and keyboard coordinate entry.

use crate::geometry::Vector2;
use serde::{Deserialize, Serialize};

/// Default polar increment in degrees.
pub const DEFAULT_POLAR_INCREMENT: f64 = 15.0;

/// Default capture tolerance around each polar ray, in degrees.
pub const DEFAULT_POLAR_TOLERANCE: f64 = 3.0;

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

/// Angle of `to - from` in degrees, normalized to 0-360.
pub fn angle_degrees(from: Vector2, to: Vector2) -> f64 {
    (to - from).angle().to_degrees().rem_euclid(360.0)
}

/// A cursor position constrained to a polar ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingResult {
    pub point: Vector2,
    /// Ray angle in degrees (0-360).
    pub angle_degrees: f64,
    /// Distance from the base point along the ray.
    pub distance: f64,
}

fn default_true() -> bool {
    true
}

fn default_increment() -> f64 {
    DEFAULT_POLAR_INCREMENT
}

fn default_tolerance() -> f64 {
    DEFAULT_POLAR_TOLERANCE
}

/// Angle-constrained tracking from the last captured point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarTracking {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_increment")]
    pub increment_degrees: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance_degrees: f64,
}

impl Default for PolarTracking {
    fn default() -> Self {
        Self {
            enabled: true,
            increment_degrees: DEFAULT_POLAR_INCREMENT,
            tolerance_degrees: DEFAULT_POLAR_TOLERANCE,
        }
    }
}

impl PolarTracking {
    /// Project `cursor` onto the closest increment ray from `base` when the
    /// cursor direction is within tolerance of it.
    pub fn track(&self, base: Vector2, cursor: Vector2) -> Option<TrackingResult> {
        if !self.enabled || self.increment_degrees <= 0.0 {
            return None;
        }
        let offset = cursor - base;
        if offset.length() < 1e-6 {
            return None;
        }
        let angle = angle_degrees(base, cursor);
        let snapped = snap_angle(angle, self.increment_degrees);
        let diff = (angle - snapped).abs();
        let diff = diff.min(360.0 - diff);
        if diff > self.tolerance_degrees {
            return None;
        }
        let ray = Vector2::polar(Vector2::ZERO, 1.0, snapped.to_radians());
        let distance = offset.dot(ray);
        Some(TrackingResult {
            point: base + ray * distance,
            angle_degrees: snapped,
            distance,
        })
    }
}

/// Keyboard buffer for typed coordinates.
///
/// Accepted forms, relative to the active tool's last captured point:
/// `x,y` absolute, `@dx,dy` relative, `dist<angle` polar (degrees) and a
/// bare `dist` along the current cursor direction.
#[derive(Debug, Clone, Default)]
pub struct DynamicInput {
    buffer: String,
}

impl DynamicInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a typed character. Returns false for characters that cannot
    /// appear in a coordinate.
    pub fn push_char(&mut self, c: char) -> bool {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | ',' | '<' | '@') {
            self.buffer.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) -> Option<char> {
        self.buffer.pop()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_active(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Resolve the buffer to a world point. `None` when it does not parse.
    pub fn parse(&self, origin: Option<Vector2>, cursor: Vector2) -> Option<Vector2> {
        let text = self.buffer.trim();
        let (relative, body) = match text.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let base = origin.unwrap_or(Vector2::ZERO);

        if let Some((dist, angle)) = body.split_once('<') {
            let dist: f64 = dist.parse().ok()?;
            let angle: f64 = angle.parse().ok()?;
            return Some(Vector2::polar(base, dist, angle.to_radians()));
        }

        if let Some((x, y)) = body.split_once(',') {
            let p = Vector2::new(x.parse().ok()?, y.parse().ok()?);
            return Some(if relative { base + p } else { p });
        }

        let dist: f64 = body.parse().ok()?;
        let origin = origin?;
        let mut dir = cursor - origin;
        if dir.length_squared() < f64::EPSILON {
            dir = Vector2::new(1.0, 0.0);
        }
        Some(origin + dir.normalized() * dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    fn typed(text: &str) -> DynamicInput {
        let mut input = DynamicInput::new();
        for c in text.chars() {
            assert!(input.push_char(c), "rejected {c}");
        }
        input
    }

    #[test]
    fn test_snap_angle() {
        assert!((snap_angle(47.0, 15.0) - 45.0).abs() < f64::EPSILON);
        assert!((snap_angle(-7.0, 15.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_angle(358.0, 15.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_angle(-20.0, 15.0) - 345.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tracking_within_tolerance() {
        let polar = PolarTracking::default();
        let hit = polar.track(v(0.0, 0.0), v(10.0, 0.3)).unwrap();
        assert_eq!(hit.angle_degrees, 0.0);
        assert!(hit.point.approx_eq(v(10.0, 0.0), 1e-9));

        let hit = polar.track(v(1.0, 1.0), v(1.1, 9.0)).unwrap();
        assert!((hit.angle_degrees - 90.0).abs() < 1e-9);
        assert!(hit.point.approx_eq(v(1.0, 9.0), 1e-9));
    }

    #[test]
    fn test_tracking_outside_tolerance() {
        let polar = PolarTracking::default();
        // 7.5 degrees sits between two rays.
        let p = Vector2::polar(v(0.0, 0.0), 10.0, 7.5_f64.to_radians());
        assert!(polar.track(v(0.0, 0.0), p).is_none());

        let off = PolarTracking { enabled: false, ..PolarTracking::default() };
        assert!(off.track(v(0.0, 0.0), v(10.0, 0.1)).is_none());
    }

    #[test]
    fn test_parse_forms() {
        let origin = Some(v(2.0, 3.0));
        let cursor = v(2.0, 10.0);
        assert_eq!(typed("5,6").parse(origin, cursor), Some(v(5.0, 6.0)));
        assert_eq!(typed("@1,-1").parse(origin, cursor), Some(v(3.0, 2.0)));
        assert!(typed("4<90").parse(origin, cursor).unwrap().approx_eq(v(2.0, 7.0), 1e-9));
        assert_eq!(typed("2").parse(origin, cursor), Some(v(2.0, 5.0)));
        assert!(typed("2").parse(None, cursor).is_none());
        assert!(typed("1,,2").parse(origin, cursor).is_none());
    }

    #[test]
    fn test_buffer_editing() {
        let mut input = DynamicInput::new();
        assert!(!input.push_char('x'));
        input.push_char('1');
        input.push_char('2');
        assert_eq!(input.backspace(), Some('2'));
        assert_eq!(input.buffer(), "1");
        input.clear();
        assert!(!input.is_active());
    }
}
