//! Monocular detection geocoding.
//!
//! Places pixel-space detections into the world frame using a single-camera
//! distance model: apparent bounding-box height is inverted through a
//! calibration constant to get range, and the horizontal offset of the box
//! center becomes a lateral offset that widens with range. The current pose
//! then lifts the camera-relative point into world coordinates.

use serde::{Deserialize, Serialize};

use crate::core::types::{Detection, Point2D, Pose2D, WorldPoint};
use crate::error::{DrishtiError, Result};

/// Configuration for the monocular distance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocoderConfig {
    /// Calibration numerator: estimated range in meters at one pixel of
    /// bounding-box height
    pub distance_scale: f32,
    /// Nearest range the model reports, meters
    pub min_distance_m: f32,
    /// Farthest range the model reports, meters
    pub max_distance_m: f32,
    /// Lateral spread per unit of normalized image offset at unit range
    pub lateral_scale: f32,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            distance_scale: 1200.0,
            min_distance_m: 2.0,
            max_distance_m: 25.0,
            lateral_scale: 1.6,
        }
    }
}

impl GeocoderConfig {
    /// Check the configuration for values the distance model cannot use.
    pub fn validate(&self) -> Result<()> {
        if !self.distance_scale.is_finite() || self.distance_scale <= 0.0 {
            return Err(DrishtiError::Config(format!(
                "distance_scale must be positive, got {}",
                self.distance_scale
            )));
        }
        if !self.min_distance_m.is_finite() || self.min_distance_m <= 0.0 {
            return Err(DrishtiError::Config(format!(
                "min_distance_m must be positive, got {}",
                self.min_distance_m
            )));
        }
        if !self.max_distance_m.is_finite() || self.max_distance_m < self.min_distance_m {
            return Err(DrishtiError::Config(format!(
                "max_distance_m must be at least min_distance_m ({} < {})",
                self.max_distance_m, self.min_distance_m
            )));
        }
        if !self.lateral_scale.is_finite() {
            return Err(DrishtiError::Config(format!(
                "lateral_scale must be finite, got {}",
                self.lateral_scale
            )));
        }
        Ok(())
    }
}

/// Projects detections from pixel space into the world frame.
pub struct DetectionGeocoder {
    config: GeocoderConfig,
}

impl DetectionGeocoder {
    /// Create a geocoder, rejecting configurations the model cannot use.
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Range implied by an apparent bounding-box height.
    ///
    /// Height is floored at one pixel, and the result is clamped to the
    /// configured range window, so every input maps to a usable distance.
    pub fn estimate_distance(&self, bbox_height_px: f32) -> f32 {
        let height = bbox_height_px.max(1.0);
        (self.config.distance_scale / height)
            .clamp(self.config.min_distance_m, self.config.max_distance_m)
    }

    /// Place one detection in the world frame.
    ///
    /// Returns `None` when the frame is degenerate (zero-sized) or the box
    /// center lies outside it. The lateral offset grows with estimated
    /// range, mirroring how a fixed pixel offset subtends more ground the
    /// farther away it is.
    pub fn geocode(
        &self,
        pose: &Pose2D,
        detection: &Detection,
        frame_width: usize,
        frame_height: usize,
    ) -> Option<WorldPoint> {
        if frame_width == 0 || frame_height == 0 {
            return None;
        }
        let (cx, cy) = detection.bbox.center();
        if !cx.is_finite() || !cy.is_finite() {
            return None;
        }
        if cx < 0.0 || cy < 0.0 || cx >= frame_width as f32 || cy >= frame_height as f32 {
            return None;
        }

        let distance = self.estimate_distance(detection.bbox.height());
        let lateral =
            (cx / frame_width as f32 - 0.5) * distance * self.config.lateral_scale;
        let world = pose.transform_point(Point2D::new(distance, lateral));

        Some(WorldPoint::new(world, detection.effective_label()))
    }

    /// The active configuration.
    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BoundingBox;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn geocoder() -> DetectionGeocoder {
        DetectionGeocoder::new(GeocoderConfig::default()).unwrap()
    }

    /// Detection centered at `(cx, cy)` with the given box height.
    fn detection_at(cx: f32, cy: f32, height: f32) -> Detection {
        let bbox = BoundingBox::new(cx - 20.0, cy - height / 2.0, cx + 20.0, cy + height / 2.0);
        Detection::new("pothole", 0.9, bbox)
    }

    // ==== Distance model ====

    #[test]
    fn test_distance_is_inverse_in_box_height() {
        let g = geocoder();
        assert_relative_eq!(g.estimate_distance(120.0), 10.0);
        assert_relative_eq!(g.estimate_distance(240.0), 5.0);
    }

    #[test]
    fn test_distance_clamps_at_both_ends() {
        let g = geocoder();
        // Huge box: nearer than the window floor
        assert_relative_eq!(g.estimate_distance(1200.0), 2.0);
        // Tiny box: farther than the window ceiling
        assert_relative_eq!(g.estimate_distance(10.0), 25.0);
        // Exact boundaries pass through unclamped
        assert_relative_eq!(g.estimate_distance(600.0), 2.0);
        assert_relative_eq!(g.estimate_distance(48.0), 25.0);
    }

    #[test]
    fn test_degenerate_box_height_is_floored() {
        let g = geocoder();
        assert_relative_eq!(g.estimate_distance(0.0), 25.0);
        assert_relative_eq!(g.estimate_distance(-5.0), 25.0);
        assert_relative_eq!(g.estimate_distance(0.3), 25.0);
    }

    // ==== Geocoding ====

    #[test]
    fn test_centered_detection_lands_straight_ahead() {
        let g = geocoder();
        let point = g
            .geocode(&Pose2D::identity(), &detection_at(320.0, 240.0, 120.0), 640, 480)
            .unwrap();
        assert_relative_eq!(point.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(point.position.y, 0.0, epsilon = 1e-4);
        assert_eq!(point.label, "pothole");
    }

    #[test]
    fn test_horizontal_offset_becomes_lateral() {
        let g = geocoder();
        // Center at 3/4 frame width: normalized offset 0.25
        let point = g
            .geocode(&Pose2D::identity(), &detection_at(480.0, 240.0, 120.0), 640, 480)
            .unwrap();
        assert_relative_eq!(point.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(point.position.y, 0.25 * 10.0 * 1.6, epsilon = 1e-4);
    }

    #[test]
    fn test_lateral_offset_scales_with_estimated_range() {
        // The same normalized image offset subtends more meters at longer
        // range, so range error compounds into lateral error
        let g = geocoder();
        let far = g
            .geocode(&Pose2D::identity(), &detection_at(480.0, 240.0, 120.0), 640, 480)
            .unwrap();
        let near = g
            .geocode(&Pose2D::identity(), &detection_at(480.0, 240.0, 240.0), 640, 480)
            .unwrap();
        assert_relative_eq!(far.position.y, 4.0, epsilon = 1e-4);
        assert_relative_eq!(near.position.y, 2.0, epsilon = 1e-4);
        assert_relative_eq!(
            far.position.y / near.position.y,
            far.position.x / near.position.x,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_pose_lifts_point_into_world_frame() {
        let g = geocoder();
        let pose = Pose2D::new(2.0, 3.0, FRAC_PI_2);
        let point = g
            .geocode(&pose, &detection_at(320.0, 240.0, 120.0), 640, 480)
            .unwrap();
        // 10 m ahead while facing +Y
        assert_relative_eq!(point.position.x, 2.0, epsilon = 1e-4);
        assert_relative_eq!(point.position.y, 13.0, epsilon = 1e-4);
    }

    #[test]
    fn test_center_outside_frame_is_dropped() {
        let g = geocoder();
        let pose = Pose2D::identity();
        assert!(g.geocode(&pose, &detection_at(700.0, 240.0, 120.0), 640, 480).is_none());
        assert!(g.geocode(&pose, &detection_at(320.0, -10.0, 120.0), 640, 480).is_none());
        assert!(g.geocode(&pose, &detection_at(640.0, 240.0, 120.0), 640, 480).is_none());
        // On-edge center at zero is still inside
        assert!(g.geocode(&pose, &detection_at(0.0, 0.0, 120.0), 640, 480).is_some());
    }

    #[test]
    fn test_zero_sized_frame_is_dropped() {
        let g = geocoder();
        let det = detection_at(320.0, 240.0, 120.0);
        assert!(g.geocode(&Pose2D::identity(), &det, 0, 480).is_none());
        assert!(g.geocode(&Pose2D::identity(), &det, 640, 0).is_none());
    }

    #[test]
    fn test_category_overrides_raw_label() {
        let g = geocoder();
        let mut det = detection_at(320.0, 240.0, 120.0);
        det.category = Some("potholes".to_string());
        let point = g
            .geocode(&Pose2D::identity(), &det, 640, 480)
            .unwrap();
        assert_eq!(point.label, "potholes");
    }

    // ==== Config validation ====

    #[test]
    fn test_invalid_configs_are_rejected() {
        let bad_scale = GeocoderConfig {
            distance_scale: 0.0,
            ..Default::default()
        };
        assert!(DetectionGeocoder::new(bad_scale).is_err());

        let inverted_window = GeocoderConfig {
            min_distance_m: 10.0,
            max_distance_m: 5.0,
            ..Default::default()
        };
        assert!(DetectionGeocoder::new(inverted_window).is_err());

        let nan_lateral = GeocoderConfig {
            lateral_scale: f32::NAN,
            ..Default::default()
        };
        assert!(DetectionGeocoder::new(nan_lateral).is_err());
    }
}
