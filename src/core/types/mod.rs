//! Core data types shared across all layers.
//!
//! Contents:
//! - [`Point2D`], [`Pose2D`]: planar geometry
//! - [`GrayFrame`]: 8-bit grayscale image frame
//! - [`BoundingBox`], [`Detection`], [`WorldPoint`]: detection data

mod detection;
mod frame;
mod pose;

pub use detection::{BoundingBox, Detection, WorldPoint};
pub use frame::GrayFrame;
pub use pose::{Point2D, Pose2D};
