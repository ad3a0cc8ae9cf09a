//! Detection mapping.
//!
//! Contents:
//! - [`geocoder`]: monocular pixel-to-world projection
//! - [`grid`]: world-anchored hit accumulation

pub mod geocoder;
pub mod grid;

pub use geocoder::{DetectionGeocoder, GeocoderConfig};
pub use grid::{OccupancyGrid, OccupancyGridConfig};
