//! Planar pose and point types.

use serde::{Deserialize, Serialize};

use crate::core::math::normalize_angle;

/// A 2D point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &Point2D) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// A 2D pose: position plus heading.
///
/// `theta` accumulates without bound as rotations compose. Call
/// [`Pose2D::normalized`] when a wrapped angle is needed for display or
/// comparison; integration itself never wraps so that winding is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading in radians, unbounded
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose. The heading is stored as given, without wrapping.
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// The origin pose with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Compose this pose with a motion delta expressed in the local frame.
    ///
    /// `forward` is meters along the current heading, `lateral` is meters
    /// to the left of it, and `dtheta` is the heading change in radians.
    pub fn compose(&self, forward: f32, lateral: f32, dtheta: f32) -> Pose2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Pose2D {
            x: self.x + forward * cos_t - lateral * sin_t,
            y: self.y + forward * sin_t + lateral * cos_t,
            theta: self.theta + dtheta,
        }
    }

    /// Transform a point from this pose's local frame into the world frame.
    pub fn transform_point(&self, p: Point2D) -> Point2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Point2D {
            x: self.x + p.x * cos_t - p.y * sin_t,
            y: self.y + p.x * sin_t + p.y * cos_t,
        }
    }

    /// This pose with heading wrapped to [-π, π].
    pub fn normalized(&self) -> Pose2D {
        Pose2D {
            x: self.x,
            y: self.y,
            theta: normalize_angle(self.theta),
        }
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_point_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_relative_eq!(a.distance_to(&b), 5.0);
        assert_relative_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_identity_pose() {
        let p = Pose2D::identity();
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.theta, 0.0);
        assert_eq!(p, Pose2D::default());
    }

    #[test]
    fn test_compose_pure_forward() {
        let p = Pose2D::identity().compose(2.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.theta, 0.0);
    }

    #[test]
    fn test_compose_forward_after_quarter_turn() {
        // Facing +Y, forward motion moves along +Y
        let p = Pose2D::new(0.0, 0.0, PI / 2.0).compose(5.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.theta, PI / 2.0);
    }

    #[test]
    fn test_compose_lateral() {
        // Facing +X, lateral moves along +Y
        let p = Pose2D::identity().compose(0.0, 1.5, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_theta_accumulates_without_wrapping() {
        let mut p = Pose2D::identity();
        for _ in 0..8 {
            p = p.compose(0.0, 0.0, PI / 2.0);
        }
        // Two full turns: raw heading keeps the winding
        assert_relative_eq!(p.theta, 4.0 * PI, epsilon = 1e-5);
        assert_relative_eq!(p.normalized().theta, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point_identity() {
        let p = Pose2D::identity().transform_point(Point2D::new(3.0, -1.0));
        assert_relative_eq!(p.x, 3.0);
        assert_relative_eq!(p.y, -1.0);
    }

    #[test]
    fn test_transform_point_rotated() {
        // Pose facing +Y: local +X maps to world +Y
        let pose = Pose2D::new(1.0, 2.0, PI / 2.0);
        let p = pose.transform_point(Point2D::new(3.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point_translated() {
        let pose = Pose2D::new(10.0, -4.0, 0.0);
        let p = pose.transform_point(Point2D::new(1.0, 1.0));
        assert_relative_eq!(p.x, 11.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, -3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalized_preserves_position() {
        let pose = Pose2D::new(7.0, -2.0, 3.0 * PI);
        let n = pose.normalized();
        assert_relative_eq!(n.x, 7.0);
        assert_relative_eq!(n.y, -2.0);
        assert_relative_eq!(n.theta, PI, epsilon = 1e-5);
    }
}
