//! Visual odometry and mapping pipeline.
//!
//! [`VisionPipeline`] owns the whole per-frame loop: feature extraction,
//! matching against the previous frame, motion estimation, pose
//! integration, and detection mapping into the occupancy grid. It is
//! single-threaded; callers drive it one frame at a time through
//! [`VisionPipeline::motion_update`] and [`VisionPipeline::map_update`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::mapping::{
    DetectionGeocoder, GeocoderConfig, OccupancyGrid, OccupancyGridConfig,
};
use crate::algorithms::motion::{integrate, MotionEstimator, MotionEstimatorConfig};
use crate::core::types::{Detection, GrayFrame, Pose2D, WorldPoint};
use crate::error::{DrishtiError, Result};
use crate::vision::{
    FeatureExtractor, FeatureExtractorConfig, FeatureMatcher, FeatureSet, MatcherConfig,
};

/// Complete pipeline configuration.
///
/// Every section has working defaults; a YAML file may set any subset of
/// sections and fields. Unknown keys are rejected so typos fail loudly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Feature extraction parameters
    pub extractor: FeatureExtractorConfig,
    /// Feature matching parameters
    pub matcher: MatcherConfig,
    /// Motion estimation parameters
    pub motion: MotionEstimatorConfig,
    /// Monocular distance model parameters
    pub geocoder: GeocoderConfig,
    /// Occupancy grid parameters
    pub grid: OccupancyGridConfig,
}

impl PipelineConfig {
    /// Parse a configuration from YAML text and validate it.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.extractor.max_features == 0 {
            return Err(DrishtiError::Config(
                "max_features must be at least 1".to_string(),
            ));
        }
        if !self.motion.scale_m_per_px.is_finite() || self.motion.scale_m_per_px <= 0.0 {
            return Err(DrishtiError::Config(format!(
                "scale_m_per_px must be positive, got {}",
                self.motion.scale_m_per_px
            )));
        }
        if self.motion.ransac.max_iterations == 0 {
            return Err(DrishtiError::Config(
                "ransac max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.motion.ransac.inlier_threshold_px.is_finite()
            || self.motion.ransac.inlier_threshold_px <= 0.0
        {
            return Err(DrishtiError::Config(format!(
                "inlier_threshold_px must be positive, got {}",
                self.motion.ransac.inlier_threshold_px
            )));
        }
        self.geocoder.validate()?;
        self.grid.validate()?;
        Ok(())
    }
}

/// Outcome of one motion update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseUpdate {
    /// Motion was recovered; the contained pose is the new accumulated pose.
    Updated(Pose2D),
    /// No reliable motion this frame; the pose is unchanged.
    Held,
}

impl PoseUpdate {
    /// The new pose, or `None` when the update held.
    pub fn pose(&self) -> Option<Pose2D> {
        match self {
            PoseUpdate::Updated(pose) => Some(*pose),
            PoseUpdate::Held => None,
        }
    }

    /// Whether this update held the previous pose.
    pub fn is_held(&self) -> bool {
        matches!(self, PoseUpdate::Held)
    }
}

/// Mutable pipeline state, grouped so it can be inspected and reset as one.
pub struct PipelineState {
    /// Accumulated world pose
    pub pose: Pose2D,
    /// Features extracted from the previous frame
    pub prev_features: Option<FeatureSet>,
    /// Detection occupancy grid
    pub grid: OccupancyGrid,
}

/// The frame-driven odometry and mapping engine.
pub struct VisionPipeline {
    config: PipelineConfig,
    extractor: FeatureExtractor,
    matcher: FeatureMatcher,
    estimator: MotionEstimator,
    geocoder: DetectionGeocoder,
    state: PipelineState,
    frame_count: u64,
}

impl VisionPipeline {
    /// Build a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let extractor = FeatureExtractor::new(config.extractor.clone());
        let matcher = FeatureMatcher::new(config.matcher.clone());
        let estimator = MotionEstimator::new(config.motion.clone());
        let geocoder = DetectionGeocoder::new(config.geocoder.clone())?;
        let grid = OccupancyGrid::new(config.grid.clone())?;

        log::info!(
            "pipeline ready: {} max features, {}x{} grid cells at {} m",
            config.extractor.max_features,
            grid.cols(),
            grid.rows(),
            config.grid.resolution_m
        );

        Ok(Self {
            config,
            extractor,
            matcher,
            estimator,
            geocoder,
            state: PipelineState {
                pose: Pose2D::identity(),
                prev_features: None,
                grid,
            },
            frame_count: 0,
        })
    }

    /// Process one frame: extract, match against the previous frame,
    /// estimate motion, and integrate it into the pose.
    ///
    /// The first frame, and any frame whose matching or fitting fails,
    /// returns [`PoseUpdate::Held`] with the pose untouched. Every frame's
    /// features replace the previous frame's, so estimation always runs
    /// over consecutive frames.
    pub fn motion_update(&mut self, frame: &GrayFrame) -> PoseUpdate {
        self.frame_count += 1;
        let features = self.extractor.extract(frame);
        log::trace!(
            "frame {}: {} keypoints from {}x{} px",
            self.frame_count,
            features.len(),
            frame.width(),
            frame.height()
        );

        let update = match self.state.prev_features.take() {
            None => {
                log::debug!("frame {}: bootstrapping, pose held", self.frame_count);
                PoseUpdate::Held
            }
            Some(prev) => {
                let matches = self.matcher.match_features(&prev, &features);
                let estimate = self.estimator.estimate(&prev, &features, &matches);
                if estimate.valid {
                    self.state.pose = integrate(&self.state.pose, &estimate);
                    log::trace!(
                        "frame {}: {} matches, moved ({:.3}, {:.3}) m, turned {:.4} rad",
                        self.frame_count,
                        matches.len(),
                        estimate.forward_m,
                        estimate.lateral_m,
                        estimate.dtheta
                    );
                    PoseUpdate::Updated(self.state.pose)
                } else {
                    log::debug!(
                        "frame {}: no reliable motion from {} matches, pose held",
                        self.frame_count,
                        matches.len()
                    );
                    PoseUpdate::Held
                }
            }
        };

        self.state.prev_features = Some(features);
        update
    }

    /// Geocode detections at the given pose and record them in the grid.
    ///
    /// Detections whose box center falls outside the frame are skipped.
    /// Every geocoded point is returned, including points beyond the grid
    /// extents; those only advance the grid's dropped counter.
    pub fn map_update(
        &mut self,
        pose: &Pose2D,
        detections: &[Detection],
        frame_width: usize,
        frame_height: usize,
    ) -> Vec<WorldPoint> {
        let mut points = Vec::with_capacity(detections.len());
        for detection in detections {
            if let Some(point) = self
                .geocoder
                .geocode(pose, detection, frame_width, frame_height)
            {
                self.state.grid.record(point.position.x, point.position.y);
                points.push(point);
            }
        }
        if points.len() < detections.len() {
            log::debug!(
                "mapped {} of {} detections, rest outside frame",
                points.len(),
                detections.len()
            );
        }
        points
    }

    /// Copy of the occupancy grid as `(width, height, row-major pixels)`.
    pub fn grid_snapshot(&self) -> (usize, usize, Vec<u8>) {
        self.state.grid.snapshot()
    }

    /// The accumulated pose.
    pub fn pose(&self) -> Pose2D {
        self.state.pose
    }

    /// The full mutable state, read-only.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// The occupancy grid.
    pub fn grid(&self) -> &OccupancyGrid {
        &self.state.grid
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Frames seen since construction or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Return to the initial state: identity pose, no previous frame,
    /// empty grid.
    pub fn reset(&mut self) {
        self.state.pose = Pose2D::identity();
        self.state.prev_features = None;
        self.state.grid.clear();
        self.frame_count = 0;
        log::debug!("pipeline reset");
    }
}
