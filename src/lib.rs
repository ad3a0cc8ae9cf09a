//! # Drishti VO
//!
//! Monocular planar visual odometry with detection occupancy mapping.
//!
//! A camera looking at locally planar ground feeds grayscale frames to the
//! pipeline. Sparse FAST corners with BRIEF descriptors are matched across
//! consecutive frames, a RANSAC rigid fit turns the matched flow into
//! frame-to-frame motion, and the motion integrates into an accumulated
//! planar pose. Object detections from an external detector are projected
//! through a monocular distance model at that pose and accumulated in a
//! world-anchored occupancy grid.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  io          detector seam, GPS tracks, export  │
//! ├─────────────────────────────────────────────────┤
//! │  engine      VisionPipeline orchestration       │
//! ├─────────────────────────────────────────────────┤
//! │  algorithms  motion fitting, geocoding, grid    │
//! ├─────────────────────────────────────────────────┤
//! │  vision      FAST, BRIEF, matching              │
//! ├─────────────────────────────────────────────────┤
//! │  core        types, math          error         │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Layers only depend downward. The pipeline is single-threaded and wholly
//! deterministic apart from RANSAC sampling.
//!
//! ## Example
//!
//! ```
//! use drishti_vo::{GrayFrame, PipelineConfig, VisionPipeline};
//!
//! let mut pipeline = VisionPipeline::new(PipelineConfig::default())?;
//!
//! // The first frame only seeds feature tracking
//! let update = pipeline.motion_update(&GrayFrame::new(640, 480));
//! assert!(update.is_held());
//! # Ok::<(), drishti_vo::DrishtiError>(())
//! ```

pub mod algorithms;
pub mod core;
pub mod engine;
pub mod error;
pub mod io;
pub mod vision;

// ==== Layer 0: Foundation ====
pub use crate::core::math;
pub use crate::core::types::{BoundingBox, Detection, GrayFrame, Point2D, Pose2D, WorldPoint};
pub use crate::error::{DrishtiError, Result};

// ==== Layer 1: Vision front-end ====
pub use crate::vision::{
    Correspondence, FeatureExtractor, FeatureExtractorConfig, FeatureMatcher, FeatureSet,
    KeyPoint, MatcherConfig,
};

// ==== Layer 2: Algorithms ====
pub use crate::algorithms::mapping::{
    DetectionGeocoder, GeocoderConfig, OccupancyGrid, OccupancyGridConfig,
};
pub use crate::algorithms::motion::{
    integrate, LeastSquaresMotionFitter, MotionEstimate, MotionEstimator, MotionEstimatorConfig,
    MotionFitter, RansacConfig, RansacMotionFitter, RigidMotionFit,
};

// ==== Layer 3: Engine ====
pub use crate::engine::{PipelineConfig, PipelineState, PoseUpdate, VisionPipeline};

// ==== Layer 4: IO ====
pub use crate::io::detector::{
    assign_categories, default_label_map, filter_by_category, map_label, Detector,
};
pub use crate::io::export::{grid_to_image, save_grid_png};
pub use crate::io::gps::{GpsSample, GpsTrack};
