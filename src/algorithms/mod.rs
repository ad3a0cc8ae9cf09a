//! Algorithm layer.
//!
//! Contents:
//! - [`motion`]: frame-to-frame rigid motion estimation
//! - [`mapping`]: detection geocoding and grid accumulation

pub mod mapping;
pub mod motion;
