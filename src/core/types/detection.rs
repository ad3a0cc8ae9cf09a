//! Object detection types and geocoded map points.

use serde::{Deserialize, Serialize};

use super::Point2D;

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge in pixels
    pub x_min: f32,
    /// Top edge in pixels
    pub y_min: f32,
    /// Right edge in pixels
    pub x_max: f32,
    /// Bottom edge in pixels
    pub y_max: f32,
}

impl BoundingBox {
    /// Create a bounding box from corner coordinates.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Box width in pixels.
    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Box height in pixels.
    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Box center `(x, y)` in pixels.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

/// A single object detection in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Raw detector class label
    pub label: String,
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// Pixel-space bounding box
    pub bbox: BoundingBox,
    /// Canonical category, when label mapping has been applied
    #[serde(default)]
    pub category: Option<String>,
}

impl Detection {
    /// Create a detection with no canonical category assigned.
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            category: None,
        }
    }

    /// The label to report downstream: the canonical category when one
    /// was assigned, otherwise the raw detector label.
    pub fn effective_label(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.label)
    }
}

/// A detection placed in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Position in the world frame, meters
    pub position: Point2D,
    /// Label carried over from the source detection
    pub label: String,
}

impl WorldPoint {
    /// Create a world point.
    pub fn new(position: Point2D, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}
