//! Closed-form least-squares rigid transform estimation.
//!
//! Solves for the planar rotation and translation that best map one point
//! set onto another in the least-squares sense. The rotation comes from the
//! cross and dot correlation sums of the centered point sets; translation
//! follows from the centroids.

use crate::core::types::Point2D;

use super::{MotionFitter, RigidMotionFit};

/// Solve for `(dx, dy, dtheta)` mapping `prev` onto `curr`.
///
/// Returns `None` when fewer than two point pairs are given or the slices
/// differ in length. Coincident point sets degrade gracefully to a pure
/// translation between centroids.
pub fn solve_rigid_transform(prev: &[Point2D], curr: &[Point2D]) -> Option<(f32, f32, f32)> {
    if prev.len() != curr.len() || prev.len() < 2 {
        return None;
    }
    let n = prev.len() as f32;

    let (mut px, mut py, mut cx, mut cy) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
    for (p, c) in prev.iter().zip(curr.iter()) {
        px += p.x;
        py += p.y;
        cx += c.x;
        cy += c.y;
    }
    let (px, py, cx, cy) = (px / n, py / n, cx / n, cy / n);

    // Correlation sums over centered coordinates
    let mut cross = 0.0f32;
    let mut dot = 0.0f32;
    for (p, c) in prev.iter().zip(curr.iter()) {
        let (pdx, pdy) = (p.x - px, p.y - py);
        let (cdx, cdy) = (c.x - cx, c.y - cy);
        cross += pdx * cdy - pdy * cdx;
        dot += pdx * cdx + pdy * cdy;
    }

    let dtheta = cross.atan2(dot);
    let (sin_t, cos_t) = dtheta.sin_cos();
    let dx = cx - (cos_t * px - sin_t * py);
    let dy = cy - (sin_t * px + cos_t * py);

    if dx.is_finite() && dy.is_finite() && dtheta.is_finite() {
        Some((dx, dy, dtheta))
    } else {
        None
    }
}

/// Apply a rigid transform to a point.
#[inline]
pub fn apply_transform(p: Point2D, dx: f32, dy: f32, dtheta: f32) -> Point2D {
    let (sin_t, cos_t) = dtheta.sin_cos();
    Point2D::new(
        cos_t * p.x - sin_t * p.y + dx,
        sin_t * p.x + cos_t * p.y + dy,
    )
}

/// Plain least-squares fitter without outlier rejection.
///
/// Fits all correspondences in one closed-form pass. Suitable when the
/// matching stage is already trusted to be outlier-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquaresMotionFitter;

impl MotionFitter for LeastSquaresMotionFitter {
    fn fit_rigid_motion(&self, prev: &[Point2D], curr: &[Point2D]) -> RigidMotionFit {
        match solve_rigid_transform(prev, curr) {
            Some((dx, dy, dtheta)) => RigidMotionFit {
                dx,
                dy,
                dtheta,
                inliers: (0..prev.len()).collect(),
                converged: true,
            },
            None => RigidMotionFit::failed(),
        }
    }
}
