//! Core foundation layer.
//!
//! This is the bottom layer of the stack with no internal dependencies.
//! All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (poses, frames, detections)
//! - [`math`]: Mathematical primitives (angle normalization)

pub mod math;
pub mod types;
