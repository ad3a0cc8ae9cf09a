//! Pipeline orchestration layer.
//!
//! Contents:
//! - [`pipeline`]: the frame-driven odometry and mapping engine

pub mod pipeline;

pub use pipeline::{PipelineConfig, PipelineState, PoseUpdate, VisionPipeline};
