//! Mathematical primitives for planar geometry.
//!
//! Functions for angle normalization and angular arithmetic.

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
///
/// Pose yaw accumulates without bound during odometry integration; apply
/// this at display and comparison boundaries.
///
/// # Example
/// ```
/// use drishti_vo::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest angular difference from angle `a` to angle `b`.
///
/// Returns the signed angle you need to add to `a` to reach `b`,
/// taking the shortest path around the circle.
///
/// # Example
/// ```
/// use drishti_vo::core::math::angle_diff;
/// use std::f32::consts::PI;
///
/// // From 0 to π/2 is +π/2
/// assert!((angle_diff(0.0, PI / 2.0) - PI / 2.0).abs() < 1e-6);
///
/// // Crossing the ±π boundary takes the short way
/// let diff = angle_diff(PI - 0.1, -PI + 0.1);
/// assert!((diff - 0.2).abs() < 1e-6);
/// ```
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}
