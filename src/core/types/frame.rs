//! Grayscale image frame.

use image::{GrayImage, Luma};

/// An 8-bit grayscale frame, row-major.
///
/// The pixel buffer always holds exactly `width * height` bytes. Pixel
/// accessors index as `data[y * width + x]` with `(0, 0)` at the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayFrame {
    /// Create a zero-filled frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap an existing row-major pixel buffer.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Copy pixels out of an [`image::GrayImage`].
    pub fn from_luma8(img: &GrayImage) -> Self {
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.as_raw().clone(),
        }
    }

    /// Convert into an [`image::GrayImage`] for encoding or display.
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.get(x as usize, y as usize)])
        })
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel intensity at `(x, y)`.
    ///
    /// # Panics
    /// Panics when the coordinate lies outside the frame.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Set the pixel intensity at `(x, y)`.
    ///
    /// # Panics
    /// Panics when the coordinate lies outside the frame.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    /// The raw row-major pixel buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
