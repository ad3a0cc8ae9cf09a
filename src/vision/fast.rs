//! FAST segment-test corner detection.
//!
//! A pixel is a corner when at least [`ARC_LENGTH`] contiguous pixels on the
//! radius-3 Bresenham circle around it are all brighter than center plus
//! threshold, or all darker than center minus threshold. Detected corners are
//! scored by the sum of absolute intensity differences over the full circle
//! and thinned with 3x3 non-maximum suppression.

use crate::core::types::GrayFrame;

/// Offsets of the 16 circle pixels, clockwise from the top.
const CIRCLE_OFFSETS: [(i32, i32); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

/// Contiguous arc length required for the segment test (FAST-9).
pub const ARC_LENGTH: usize = 9;

/// A corner candidate with its position and contrast score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    /// Pixel column
    pub x: usize,
    /// Pixel row
    pub y: usize,
    /// Sum of absolute differences between circle pixels and center
    pub score: u32,
}

/// Run the segment test at `(x, y)`.
///
/// The caller must keep `(x, y)` at least 3 pixels from every frame edge.
pub fn is_corner(frame: &GrayFrame, x: usize, y: usize, threshold: u8) -> bool {
    let center = frame.get(x, y) as i16;
    let t = threshold as i16;

    let mut brighter = [false; 16];
    let mut darker = [false; 16];
    for (i, &(dx, dy)) in CIRCLE_OFFSETS.iter().enumerate() {
        let p = frame.get((x as i32 + dx) as usize, (y as i32 + dy) as usize) as i16;
        brighter[i] = p > center + t;
        darker[i] = p < center - t;
    }

    longest_circular_run(&brighter) >= ARC_LENGTH || longest_circular_run(&darker) >= ARC_LENGTH
}

/// Corner contrast score: SAD between the 16 circle pixels and the center.
pub fn corner_score(frame: &GrayFrame, x: usize, y: usize) -> u32 {
    let center = frame.get(x, y) as i32;
    CIRCLE_OFFSETS
        .iter()
        .map(|&(dx, dy)| {
            let p = frame.get((x as i32 + dx) as usize, (y as i32 + dy) as usize) as i32;
            (p - center).unsigned_abs()
        })
        .sum()
}

/// Longest run of set flags, treating the array as circular.
fn longest_circular_run(flags: &[bool; 16]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for i in 0..32 {
        if flags[i % 16] {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest.min(16)
}

/// Detect and score all corners in the frame interior.
///
/// Pixels closer than `margin` to any edge are skipped; the margin is raised
/// to 3 when smaller so circle reads stay in bounds. Scan order is row-major,
/// so output order is deterministic.
pub fn detect_corners(frame: &GrayFrame, threshold: u8, margin: usize) -> Vec<Corner> {
    let margin = margin.max(3);
    let (width, height) = (frame.width(), frame.height());
    if width <= 2 * margin || height <= 2 * margin {
        return Vec::new();
    }

    let mut corners = Vec::new();
    for y in margin..height - margin {
        for x in margin..width - margin {
            if is_corner(frame, x, y, threshold) {
                corners.push(Corner {
                    x,
                    y,
                    score: corner_score(frame, x, y),
                });
            }
        }
    }
    corners
}

/// 3x3 non-maximum suppression.
///
/// A corner survives when no corner in its 8-neighborhood has a strictly
/// greater score. Equal-score neighbors both survive.
pub fn suppress_non_maxima(corners: &[Corner], width: usize, height: usize) -> Vec<Corner> {
    if corners.is_empty() {
        return Vec::new();
    }

    let mut score_map = vec![0u32; width * height];
    for c in corners {
        score_map[c.y * width + c.x] = c.score;
    }

    corners
        .iter()
        .filter(|c| {
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = c.x as i32 + dx;
                    let ny = c.y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    if score_map[ny as usize * width + nx as usize] > c.score {
                        return false;
                    }
                }
            }
            true
        })
        .copied()
        .collect()
}
