//! Frame-to-frame motion estimation.
//!
//! Matched keypoints from consecutive frames are ranked by descriptor
//! distance, fitted with a rigid transform behind the [`MotionFitter`]
//! seam, and converted to a metric motion estimate that
//! [`integrate`] folds into the accumulated pose.
//!
//! Contents:
//! - [`rigid`]: closed-form least-squares solver
//! - [`ransac`]: robust sampling fitter
//! - [`MotionEstimator`]: correspondence ranking + pixel-to-meter conversion

pub mod ransac;
pub mod rigid;

pub use ransac::{RansacConfig, RansacMotionFitter};
pub use rigid::{solve_rigid_transform, LeastSquaresMotionFitter};

use serde::{Deserialize, Serialize};

use crate::core::types::{Point2D, Pose2D};
use crate::vision::extractor::FeatureSet;
use crate::vision::matcher::Correspondence;

/// Interface for rigid motion fitting over matched point sets.
///
/// `prev[k]` and `curr[k]` are corresponding points; implementations
/// return a failed fit rather than erroring when the input is too small
/// or degenerate.
pub trait MotionFitter {
    /// Estimate the rigid transform mapping `prev` points onto `curr`.
    fn fit_rigid_motion(&self, prev: &[Point2D], curr: &[Point2D]) -> RigidMotionFit;
}

/// Result of a rigid motion fit in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidMotionFit {
    /// Image-space translation along x in pixels
    pub dx: f32,
    /// Image-space translation along y in pixels
    pub dy: f32,
    /// Image-space rotation in radians
    pub dtheta: f32,
    /// Indices of the correspondences the fit explains
    pub inliers: Vec<usize>,
    /// Whether the fit met its acceptance criteria
    pub converged: bool,
}

impl RigidMotionFit {
    /// A fit that did not converge.
    pub fn failed() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            dtheta: 0.0,
            inliers: Vec::new(),
            converged: false,
        }
    }
}

/// A metric motion estimate between consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionEstimate {
    /// Forward motion in meters, camera-forward positive
    pub forward_m: f32,
    /// Lateral motion in meters, left positive
    pub lateral_m: f32,
    /// Heading change in radians
    pub dtheta: f32,
    /// False when no reliable motion could be recovered
    pub valid: bool,
}

impl MotionEstimate {
    /// The no-information estimate.
    pub fn invalid() -> Self {
        Self {
            forward_m: 0.0,
            lateral_m: 0.0,
            dtheta: 0.0,
            valid: false,
        }
    }
}

/// Configuration for motion estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionEstimatorConfig {
    /// Meters of ground motion per pixel of image translation
    pub scale_m_per_px: f32,
    /// Correspondences kept after ranking by descriptor distance
    pub max_matches: usize,
    /// Minimum correspondences required to attempt a fit
    pub min_correspondences: usize,
    /// Robust fitting parameters
    pub ransac: RansacConfig,
}

impl Default for MotionEstimatorConfig {
    fn default() -> Self {
        Self {
            scale_m_per_px: 0.02,
            max_matches: 80,
            min_correspondences: 8,
            ransac: RansacConfig::default(),
        }
    }
}

/// Converts matched features into metric frame-to-frame motion.
///
/// Correspondences are sorted by ascending descriptor distance with the
/// previous-frame index as tie-break, truncated to the configured budget,
/// and handed to the fitter. Image translation converts to meters with the
/// planar ground model: upward image flow is forward motion, rightward
/// flow is leftward lateral motion.
pub struct MotionEstimator {
    config: MotionEstimatorConfig,
    fitter: Box<dyn MotionFitter>,
}

impl MotionEstimator {
    /// Create an estimator backed by the RANSAC fitter.
    pub fn new(config: MotionEstimatorConfig) -> Self {
        let fitter = Box::new(RansacMotionFitter::new(config.ransac.clone()));
        Self { config, fitter }
    }

    /// Create an estimator with a caller-supplied fitter.
    pub fn with_fitter(config: MotionEstimatorConfig, fitter: Box<dyn MotionFitter>) -> Self {
        Self { config, fitter }
    }

    /// Estimate metric motion from one frame pair's correspondences.
    ///
    /// Returns [`MotionEstimate::invalid`] when there are too few
    /// correspondences or the fit does not converge.
    pub fn estimate(
        &self,
        prev: &FeatureSet,
        curr: &FeatureSet,
        matches: &[Correspondence],
    ) -> MotionEstimate {
        if matches.len() < self.config.min_correspondences {
            return MotionEstimate::invalid();
        }

        let mut ranked: Vec<&Correspondence> = matches.iter().collect();
        ranked.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then(a.prev_idx.cmp(&b.prev_idx))
        });
        ranked.truncate(self.config.max_matches);

        let prev_pts: Vec<Point2D> = ranked
            .iter()
            .map(|m| prev.keypoints[m.prev_idx].point())
            .collect();
        let curr_pts: Vec<Point2D> = ranked
            .iter()
            .map(|m| curr.keypoints[m.curr_idx].point())
            .collect();

        let fit = self.fitter.fit_rigid_motion(&prev_pts, &curr_pts);
        if !fit.converged {
            return MotionEstimate::invalid();
        }

        MotionEstimate {
            forward_m: -fit.dy * self.config.scale_m_per_px,
            lateral_m: fit.dx * self.config.scale_m_per_px,
            dtheta: fit.dtheta,
            valid: true,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MotionEstimatorConfig {
        &self.config
    }
}

/// Fold a motion estimate into an accumulated pose.
///
/// Invalid estimates hold the pose: the returned value is the input pose,
/// bit for bit. Valid estimates compose in the local frame, so heading
/// keeps accumulating without wrapping.
pub fn integrate(pose: &Pose2D, estimate: &MotionEstimate) -> Pose2D {
    if !estimate.valid {
        return *pose;
    }
    pose.compose(estimate.forward_m, estimate.lateral_m, estimate.dtheta)
}
