//! Detection occupancy grid.
//!
//! A fixed-extent, fixed-resolution 2D array of hit intensities centered on
//! the world origin. World x maps to rows growing downward from the origin
//! row (so +x is "up" in the exported image) and world y maps to columns
//! growing rightward. Each recorded hit adds a fixed increment, saturating
//! at a ceiling; hits outside the extent are counted and dropped.

use serde::{Deserialize, Serialize};

use crate::error::{DrishtiError, Result};

/// Configuration for the occupancy grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OccupancyGridConfig {
    /// Physical extent along world y, meters
    pub width_m: f32,
    /// Physical extent along world x, meters
    pub height_m: f32,
    /// Cell edge length, meters
    pub resolution_m: f32,
    /// Intensity added per hit
    pub hit_increment: u8,
    /// Intensity ceiling per cell
    pub max_intensity: u8,
}

impl Default for OccupancyGridConfig {
    fn default() -> Self {
        Self {
            width_m: 50.0,
            height_m: 50.0,
            resolution_m: 0.2,
            hit_increment: 12,
            max_intensity: 255,
        }
    }
}

impl OccupancyGridConfig {
    /// Check the configuration for values the grid cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if !self.resolution_m.is_finite() || self.resolution_m <= 0.0 {
            return Err(DrishtiError::Config(format!(
                "resolution_m must be positive, got {}",
                self.resolution_m
            )));
        }
        if !self.width_m.is_finite() || self.width_m <= 0.0 {
            return Err(DrishtiError::Config(format!(
                "width_m must be positive, got {}",
                self.width_m
            )));
        }
        if !self.height_m.is_finite() || self.height_m <= 0.0 {
            return Err(DrishtiError::Config(format!(
                "height_m must be positive, got {}",
                self.height_m
            )));
        }
        if self.hit_increment == 0 {
            return Err(DrishtiError::Config(
                "hit_increment must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Accumulates geocoded detection hits into a world-anchored grid.
pub struct OccupancyGrid {
    config: OccupancyGridConfig,
    rows: usize,
    cols: usize,
    origin_row: usize,
    origin_col: usize,
    cells: Vec<u8>,
    recorded: u64,
    dropped: u64,
}

impl OccupancyGrid {
    /// Build a grid covering the configured extents.
    ///
    /// Cell counts are the extents divided by the resolution, rounded to
    /// the nearest integer; the origin sits at the center cell.
    pub fn new(config: OccupancyGridConfig) -> Result<Self> {
        config.validate()?;
        let rows = (config.height_m / config.resolution_m).round() as usize;
        let cols = (config.width_m / config.resolution_m).round() as usize;
        if rows == 0 || cols == 0 {
            return Err(DrishtiError::Config(format!(
                "grid extents {}x{} m round to zero cells at {} m resolution",
                config.width_m, config.height_m, config.resolution_m
            )));
        }
        Ok(Self {
            origin_row: rows / 2,
            origin_col: cols / 2,
            cells: vec![0; rows * cols],
            rows,
            cols,
            recorded: 0,
            dropped: 0,
            config,
        })
    }

    /// Map a world position to a grid cell.
    ///
    /// Fractional cell coordinates truncate toward zero. Returns `None`
    /// for positions outside the grid or non-finite input.
    pub fn world_to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let row_f = self.origin_row as f32 - x / self.config.resolution_m;
        let col_f = self.origin_col as f32 + y / self.config.resolution_m;
        if !row_f.is_finite() || !col_f.is_finite() {
            return None;
        }
        let row = row_f as i64;
        let col = col_f as i64;
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// World position of a cell's center.
    pub fn cell_to_world(&self, row: usize, col: usize) -> (f32, f32) {
        let x = (self.origin_row as f32 - (row as f32 + 0.5)) * self.config.resolution_m;
        let y = ((col as f32 + 0.5) - self.origin_col as f32) * self.config.resolution_m;
        (x, y)
    }

    /// Record one detection hit at a world position.
    ///
    /// In-grid hits bump the cell by `hit_increment`, saturating at
    /// `max_intensity`. Out-of-grid hits only advance the dropped counter.
    pub fn record(&mut self, x: f32, y: f32) {
        match self.world_to_cell(x, y) {
            Some((row, col)) => {
                let idx = row * self.cols + col;
                self.cells[idx] = self.cells[idx]
                    .saturating_add(self.config.hit_increment)
                    .min(self.config.max_intensity);
                self.recorded += 1;
            }
            None => self.dropped += 1,
        }
    }

    /// Grid height in cells.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid width in cells.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The `(row, col)` of the world origin.
    #[inline]
    pub fn origin_cell(&self) -> (usize, usize) {
        (self.origin_row, self.origin_col)
    }

    /// Intensity of one cell, or `None` outside the grid.
    pub fn intensity_at(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Number of cells with any recorded intensity.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Hits accumulated inside the grid.
    #[inline]
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Hits dropped for falling outside the grid.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Copy the grid as `(width, height, row-major intensities)`, the
    /// shape image encoders expect.
    pub fn snapshot(&self) -> (usize, usize, Vec<u8>) {
        (self.cols, self.rows, self.cells.clone())
    }

    /// Reset all cells and counters, keeping the geometry.
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.recorded = 0;
        self.dropped = 0;
    }

    /// The active configuration.
    pub fn config(&self) -> &OccupancyGridConfig {
        &self.config
    }
}
