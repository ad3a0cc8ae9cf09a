//! Input/output adapters.
//!
//! Contents:
//! - [`detector`]: external detector seam and label normalization
//! - [`gps`]: GPS track loading and timestamp lookup
//! - [`export`]: occupancy grid image export

pub mod detector;
pub mod export;
pub mod gps;

pub use detector::{
    assign_categories, default_label_map, filter_by_category, map_label, Detector,
};
pub use export::{grid_to_image, save_grid_png};
pub use gps::{GpsSample, GpsTrack};
