//! RANSAC rigid motion fitting.
//!
//! Samples two-point hypotheses, scores them by inlier count, and refines
//! the best consensus set with the closed-form least-squares solver.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

use super::rigid::{apply_transform, solve_rigid_transform};
use super::{MotionFitter, RigidMotionFit};

/// Segments shorter than this cannot anchor a rotation hypothesis.
const MIN_SEGMENT_LENGTH: f32 = 1e-3;

/// Allowed deviation of the segment length ratio from 1. A matched pair
/// whose separation stretches or shrinks beyond this cannot come from a
/// rigid motion.
const MAX_LENGTH_RATIO_DEVIATION: f32 = 0.3;

/// RANSAC sampling and acceptance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RansacConfig {
    /// Maximum sampling iterations per fit
    pub max_iterations: usize,
    /// Residual in pixels below which a correspondence counts as an inlier
    pub inlier_threshold_px: f32,
    /// Fraction of correspondences that must be inliers to accept the fit
    pub min_inlier_ratio: f32,
    /// Inlier fraction that ends sampling early
    pub early_termination_ratio: f32,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            inlier_threshold_px: 3.0,
            min_inlier_ratio: 0.3,
            early_termination_ratio: 0.9,
        }
    }
}

impl RansacConfig {
    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the inlier residual threshold in pixels.
    pub fn with_inlier_threshold(mut self, threshold_px: f32) -> Self {
        self.inlier_threshold_px = threshold_px;
        self
    }

    /// Set the minimum inlier fraction for acceptance.
    pub fn with_min_inlier_ratio(mut self, ratio: f32) -> Self {
        self.min_inlier_ratio = ratio;
        self
    }

    /// Set the inlier fraction that stops sampling early.
    pub fn with_early_termination_ratio(mut self, ratio: f32) -> Self {
        self.early_termination_ratio = ratio;
        self
    }
}

/// Robust rigid motion fitter.
///
/// Each iteration draws two correspondences, derives the unique rigid
/// transform aligning their segment, and counts how many correspondences it
/// explains within the pixel threshold. The best consensus set is refined
/// with a full least-squares pass before being returned.
pub struct RansacMotionFitter {
    config: RansacConfig,
}

impl RansacMotionFitter {
    /// Create a fitter.
    pub fn new(config: RansacConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &RansacConfig {
        &self.config
    }
}

impl MotionFitter for RansacMotionFitter {
    fn fit_rigid_motion(&self, prev: &[Point2D], curr: &[Point2D]) -> RigidMotionFit {
        let n = prev.len().min(curr.len());
        if n < 2 {
            return RigidMotionFit::failed();
        }

        let min_inliers = ((n as f32 * self.config.min_inlier_ratio).ceil() as usize).max(2);
        let early_stop = (n as f32 * self.config.early_termination_ratio).ceil() as usize;
        let threshold = self.config.inlier_threshold_px;

        let mut rng = rand::rng();
        let mut best_inliers: Vec<usize> = Vec::new();

        for _ in 0..self.config.max_iterations {
            let i = rng.random_range(0..n);
            let j = rng.random_range(0..n);
            if i == j {
                continue;
            }
            let Some((dx, dy, dtheta)) = pair_hypothesis(prev[i], prev[j], curr[i], curr[j])
            else {
                continue;
            };

            let inliers: Vec<usize> = (0..n)
                .filter(|&k| {
                    apply_transform(prev[k], dx, dy, dtheta).distance_to(&curr[k]) <= threshold
                })
                .collect();

            if inliers.len() > best_inliers.len() {
                best_inliers = inliers;
                if best_inliers.len() >= early_stop {
                    break;
                }
            }
        }

        if best_inliers.len() < min_inliers {
            return RigidMotionFit::failed();
        }

        let inlier_prev: Vec<Point2D> = best_inliers.iter().map(|&k| prev[k]).collect();
        let inlier_curr: Vec<Point2D> = best_inliers.iter().map(|&k| curr[k]).collect();
        match solve_rigid_transform(&inlier_prev, &inlier_curr) {
            Some((dx, dy, dtheta)) => RigidMotionFit {
                dx,
                dy,
                dtheta,
                inliers: best_inliers,
                converged: true,
            },
            None => RigidMotionFit::failed(),
        }
    }
}

/// Rigid transform implied by one matched point pair.
///
/// Rejects pairs whose segments are too short to orient, or whose lengths
/// disagree beyond [`MAX_LENGTH_RATIO_DEVIATION`].
fn pair_hypothesis(p0: Point2D, p1: Point2D, c0: Point2D, c1: Point2D) -> Option<(f32, f32, f32)> {
    let (pvx, pvy) = (p1.x - p0.x, p1.y - p0.y);
    let (cvx, cvy) = (c1.x - c0.x, c1.y - c0.y);
    let plen = (pvx * pvx + pvy * pvy).sqrt();
    let clen = (cvx * cvx + cvy * cvy).sqrt();
    if plen < MIN_SEGMENT_LENGTH || clen < MIN_SEGMENT_LENGTH {
        return None;
    }
    if (clen / plen - 1.0).abs() > MAX_LENGTH_RATIO_DEVIATION {
        return None;
    }

    let dtheta = (pvx * cvy - pvy * cvx).atan2(pvx * cvx + pvy * cvy);
    let (sin_t, cos_t) = dtheta.sin_cos();
    let (pmx, pmy) = ((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0);
    let (cmx, cmy) = ((c0.x + c1.x) / 2.0, (c0.y + c1.y) / 2.0);
    let dx = cmx - (cos_t * pmx - sin_t * pmy);
    let dy = cmy - (sin_t * pmx + cos_t * pmy);
    Some((dx, dy, dtheta))
}
