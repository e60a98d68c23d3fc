//! 2D vector math, affine helpers and the shared segment/polygon algorithms.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, Div, Mul, MulAssign, Neg, SubAssign};

/// General purpose geometric epsilon.
pub const EPSILON: f64 = 1e-9;

/// Threshold on `|r × s|` below which two segments count as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-4;

/// A 2D point or direction in world units.
///
/// Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Direction vector from `a` to `b`.
    pub fn from_points(a: Vector2, b: Vector2) -> Self {
        b - a
    }

    pub fn dot(self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_to(self, other: Vector2) -> f64 {
        (other - self).length()
    }

    /// Angle of the vector in radians, measured from +X.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Left-hand normal `(-y, x)`.
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Normalize in place and return `self` for chaining.
    ///
    /// A zero-length vector is left unchanged.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len > EPSILON {
            self.x /= len;
            self.y /= len;
        }
        self
    }

    /// Normalized copy (zero stays zero).
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Add in place and return `self` for chaining.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&mut self, other: Vector2) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    /// Subtract in place and return `self` for chaining.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&mut self, other: Vector2) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    /// Scale in place and return `self` for chaining.
    pub fn multiply_scalar(&mut self, factor: f64) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self
    }

    /// Unclamped linear interpolation; `t` outside `[0, 1]` extrapolates.
    pub fn lerp(a: Vector2, b: Vector2, t: f64) -> Vector2 {
        Vector2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }

    pub fn midpoint(a: Vector2, b: Vector2) -> Vector2 {
        Self::lerp(a, b, 0.5)
    }

    /// Point on a circle of `radius` around `center` at `angle`.
    pub fn polar(center: Vector2, radius: f64, angle: f64) -> Vector2 {
        Vector2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    /// Apply an affine transform to this point.
    pub fn transform(self, matrix: &Affine) -> Vector2 {
        (*matrix * Point::from(self)).into()
    }

    pub fn approx_eq(self, other: Vector2, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Vector2> for [f64; 2] {
    fn from(v: Vector2) -> Self {
        [v.x, v.y]
    }
}

impl From<Point> for Vector2 {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Vector2> for Point {
    fn from(v: Vector2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl std::ops::Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;
    fn div(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f64> for Vector2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

// ---------------------------------------------------------------------------
// Transform matrices
// ---------------------------------------------------------------------------

/// 2D affine transform with coefficients `[a, b, c, d, e, f]`, i.e.
/// `[[a, c, e], [b, d, f], [0, 0, 1]]`. Composition is `*` (right operand
/// applied first).
pub type TransformMatrix = Affine;

pub fn identity() -> Affine {
    Affine::IDENTITY
}

pub fn translation(delta: Vector2) -> Affine {
    Affine::translate(Vec2::from(delta))
}

pub fn rotation(angle: f64) -> Affine {
    Affine::rotate(angle)
}

pub fn rotation_about(center: Vector2, angle: f64) -> Affine {
    Affine::rotate_about(angle, Point::from(center))
}

pub fn scale(sx: f64, sy: f64) -> Affine {
    Affine::scale_non_uniform(sx, sy)
}

/// Uniform scale about `center`, written out directly as
/// translate(+center) · scale · translate(-center).
pub fn scale_about(center: Vector2, factor: f64) -> Affine {
    Affine::new([
        factor,
        0.0,
        0.0,
        factor,
        center.x * (1.0 - factor),
        center.y * (1.0 - factor),
    ])
}

/// Scale magnitudes of the x and y basis vectors: `(√(a²+b²), √(c²+d²))`.
pub fn axis_scales(matrix: &Affine) -> (f64, f64) {
    let [a, b, c, d, _, _] = matrix.as_coeffs();
    ((a * a + b * b).sqrt(), (c * c + d * d).sqrt())
}

/// Average of the two axis scale magnitudes.
pub fn average_scale(matrix: &Affine) -> f64 {
    let (sx, sy) = axis_scales(matrix);
    (sx + sy) / 2.0
}

/// Rotation component of the matrix in radians.
pub fn rotation_angle(matrix: &Affine) -> f64 {
    let [a, b, _, _, _, _] = matrix.as_coeffs();
    b.atan2(a)
}

/// True when the matrix mirrors (negative determinant).
pub fn is_mirroring(matrix: &Affine) -> bool {
    matrix.determinant() < 0.0
}

// ---------------------------------------------------------------------------
// Segment algorithms
// ---------------------------------------------------------------------------

/// Nearest point on segment `a → b`: project, clamp `t` to `[0, 1]`, lerp.
/// A zero-length segment returns `a`.
pub fn nearest_point_on_segment(point: Vector2, a: Vector2, b: Vector2) -> Vector2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f64::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    Vector2::lerp(a, b, t)
}

pub fn distance_to_segment(point: Vector2, a: Vector2, b: Vector2) -> f64 {
    point.distance_to(nearest_point_on_segment(point, a, b))
}

/// Foot of the perpendicular from `point` onto the infinite line through
/// `a` and `b`, with its line parameter. `None` for a zero-length segment.
pub fn project_onto_line(point: Vector2, a: Vector2, b: Vector2) -> Option<(Vector2, f64)> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f64::EPSILON {
        return None;
    }
    let t = (point - a).dot(ab) / len_sq;
    Some((Vector2::lerp(a, b, t), t))
}

/// Intersection point of segments `a1 → a2` and `b1 → b2`.
///
/// Parallel segments (`|r × s| < 1e-4`) never intersect, including colinear
/// overlapping ones.
pub fn segment_intersection_point(
    a1: Vector2,
    a2: Vector2,
    b1: Vector2,
    b2: Vector2,
) -> Option<Vector2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.cross(s);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let qp = b1 - a1;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1 + r * t)
    } else {
        None
    }
}

/// Test whether two segments cross.
pub fn segments_intersect(a1: Vector2, a2: Vector2, b1: Vector2, b2: Vector2) -> bool {
    segment_intersection_point(a1, a2, b1, b2).is_some()
}

/// Consecutive segments of a vertex chain, including the closing segment
/// when `closed` is set.
pub fn chain_segments(points: &[Vector2], closed: bool) -> Vec<(Vector2, Vector2)> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| (points[i], points[(i + 1) % n]))
        .collect()
}

/// Window-selection test: any vertex inside the (inclusive) window, or any
/// segment crossing one of the four window edges.
pub fn segments_intersect_rect(segments: &[(Vector2, Vector2)], min: Vector2, max: Vector2) -> bool {
    let window = Rect::new(min.x, min.y, max.x, max.y);
    if segments
        .iter()
        .any(|&(a, b)| rect_contains_inclusive(window, a) || rect_contains_inclusive(window, b))
    {
        return true;
    }
    let corners = [
        Vector2::new(min.x, min.y),
        Vector2::new(max.x, min.y),
        Vector2::new(max.x, max.y),
        Vector2::new(min.x, max.y),
    ];
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    segments.iter().any(|&(a, b)| {
        edges
            .iter()
            .any(|&(c, d)| segments_intersect(a, b, c, d))
    })
}

// ---------------------------------------------------------------------------
// Polygons and boxes
// ---------------------------------------------------------------------------

/// Even-odd ray casting. Needs at least three vertices.
pub fn point_in_polygon(point: Vector2, polygon: &[Vector2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);
        if (yi > point.y) != (yj > point.y) && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shoelace signed area (positive for counter-clockwise in y-up space).
pub fn polygon_signed_area(polygon: &[Vector2]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .map(|i| polygon[i].cross(polygon[(i + 1) % n]))
        .sum();
    sum / 2.0
}

pub fn polygon_area(polygon: &[Vector2]) -> f64 {
    polygon_signed_area(polygon).abs()
}

/// Sum of edge lengths including the closing edge.
pub fn polygon_perimeter(polygon: &[Vector2]) -> f64 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| polygon[i].distance_to(polygon[(i + 1) % n]))
        .sum()
}

/// Area centroid; falls back to the vertex average for degenerate polygons.
pub fn polygon_centroid(polygon: &[Vector2]) -> Vector2 {
    if polygon.is_empty() {
        return Vector2::ZERO;
    }
    let area = polygon_signed_area(polygon);
    if area.abs() < EPSILON {
        let sum = polygon.iter().fold(Vector2::ZERO, |acc, p| acc + *p);
        return sum / polygon.len() as f64;
    }
    let n = polygon.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let cross = p.cross(q);
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    Vector2::new(cx / (6.0 * area), cy / (6.0 * area))
}

/// Axis-aligned box around a set of points (zero rect when empty).
pub fn bounds_of(points: &[Vector2]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Inclusive containment on all four edges (`kurbo::Rect::contains` excludes
/// the max edges).
pub fn rect_contains_inclusive(rect: Rect, point: Vector2) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Distance from a point to an axis-aligned box (zero inside).
pub fn distance_to_rect(rect: Rect, point: Vector2) -> f64 {
    let dx = (rect.x0 - point.x).max(0.0).max(point.x - rect.x1);
    let dy = (rect.y0 - point.y).max(0.0).max(point.y - rect.y1);
    (dx * dx + dy * dy).sqrt()
}
