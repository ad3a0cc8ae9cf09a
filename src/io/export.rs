//! Occupancy grid image export.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::algorithms::mapping::OccupancyGrid;
use crate::error::Result;

/// Render the grid as an 8-bit grayscale image.
///
/// Cell intensities map directly to pixel values; row 0 is the top of the
/// image, so +x in the world points up.
pub fn grid_to_image(grid: &OccupancyGrid) -> GrayImage {
    let (width, height, pixels) = grid.snapshot();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([pixels[y as usize * width + x as usize]])
    })
}

/// Write the grid to a PNG file.
pub fn save_grid_png(grid: &OccupancyGrid, path: impl AsRef<Path>) -> Result<()> {
    grid_to_image(grid).save(path)?;
    Ok(())
}
