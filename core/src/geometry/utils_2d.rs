//! 2D pixel geometry utilities for the polygon editor.
//!
//! Vertex positions are integer pixel coordinates; everything that needs
//! trigonometry goes through `f64` and rounds back to the nearest pixel.

use nalgebra as na;

pub type Vector2 = na::Vector2<f64>;

/// Tolerance for floating-point comparisons
pub const EPSILON: f64 = 1e-6;

// =============================================================================
// Point Operations
// =============================================================================

/// Convert a pixel position into a float vector.
#[inline]
pub fn to_vector(p: [i32; 2]) -> Vector2 {
    Vector2::new(p[0] as f64, p[1] as f64)
}

/// Compute squared distance between two pixel positions.
#[inline]
pub fn distance_squared(p1: [i32; 2], p2: [i32; 2]) -> i64 {
    let dx = p2[0] as i64 - p1[0] as i64;
    let dy = p2[1] as i64 - p1[1] as i64;
    dx * dx + dy * dy
}

/// Compute distance between two pixel positions.
#[inline]
pub fn distance(p1: [i32; 2], p2: [i32; 2]) -> f64 {
    (distance_squared(p1, p2) as f64).sqrt()
}

/// True if `point` lies within `radius` pixels of `target`.
#[inline]
pub fn is_near(point: [i32; 2], target: [i32; 2], radius: i32) -> bool {
    let r = radius as i64;
    distance_squared(point, target) <= r * r
}

// =============================================================================
// Vector Operations
// =============================================================================

/// 2D cross product (z-component of 3D cross product).
/// Positive if v2 is counter-clockwise from v1.
#[inline]
pub fn cross_2d(v1: Vector2, v2: Vector2) -> f64 {
    v1.x * v2.y - v1.y * v2.x
}

/// 2D dot product.
#[inline]
pub fn dot_2d(v1: Vector2, v2: Vector2) -> f64 {
    v1.dot(&v2)
}

// =============================================================================
// Angles
// =============================================================================

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can land on 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Shortest angular distance between two angles in degrees, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Angle at `middle` swept counter-clockwise from the arm towards `prev`
/// to the arm towards `next`, in degrees `[0, 360)`.
///
/// Returns `None` when a neighbour is missing (open polyline endpoints)
/// or when either arm has zero length.
pub fn angle_between(prev: Option<[i32; 2]>, middle: [i32; 2], next: Option<[i32; 2]>) -> Option<f64> {
    let (prev, next) = (prev?, next?);
    let a = to_vector(prev) - to_vector(middle);
    let b = to_vector(next) - to_vector(middle);
    if a.norm() < EPSILON || b.norm() < EPSILON {
        return None;
    }

    let radians = cross_2d(a, b).atan2(dot_2d(a, b));
    Some(normalize_degrees(radians.to_degrees()))
}

/// Rotate `point` around `center` by `degrees` (counter-clockwise in a
/// y-up frame), preserving its distance from `center` up to pixel rounding.
pub fn rotate_about(point: [i32; 2], center: [i32; 2], degrees: f64) -> [i32; 2] {
    let rotation = na::Rotation2::new(degrees.to_radians());
    let c = to_vector(center);
    let rotated = c + rotation * (to_vector(point) - c);
    [rotated.x.round() as i32, rotated.y.round() as i32]
}

// =============================================================================
// Segment Hit Testing
// =============================================================================

/// True if `point` lies near the segment `a`-`b`.
///
/// A point outside the segment's open coordinate range on an axis is rejected
/// only when the segment spans more than `bbox_slack` pixels on that axis, so
/// nearly axis-aligned edges stay easy to hit. The remaining candidates are
/// accepted when their perpendicular distance to the line is at most
/// `max_distance` pixels (tested as `|cross| <= max_distance * |b - a|`).
pub fn is_near_segment(a: [i32; 2], b: [i32; 2], point: [i32; 2], max_distance: i32, bbox_slack: i32) -> bool {
    let [x, y] = point;

    if (x <= a[0].min(b[0]) || x >= a[0].max(b[0])) && (a[0] - b[0]).abs() > bbox_slack {
        return false;
    }
    if (y <= a[1].min(b[1]) || y >= a[1].max(b[1])) && (a[1] - b[1]).abs() > bbox_slack {
        return false;
    }

    let len = distance(a, b);
    if len < EPSILON {
        return is_near(point, a, max_distance);
    }

    let cross = (x as i64 - a[0] as i64) * (b[1] as i64 - a[1] as i64)
        - (b[0] as i64 - a[0] as i64) * (y as i64 - a[1] as i64);
    (cross.abs() as f64) <= len * max_distance as f64
}
