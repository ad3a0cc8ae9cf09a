//! Keypoint and descriptor extraction.

use serde::{Deserialize, Serialize};

use crate::core::types::{GrayFrame, Point2D};
use crate::vision::brief::{self, BriefPattern, Descriptor};
use crate::vision::fast;

/// Configuration for feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureExtractorConfig {
    /// Maximum keypoints kept per frame, strongest first
    pub max_features: usize,
    /// FAST segment-test contrast threshold
    pub fast_threshold: u8,
    /// BRIEF sampling patch side length in pixels
    pub patch_size: usize,
    /// Seed for the BRIEF comparison pattern
    pub pattern_seed: u64,
}

impl Default for FeatureExtractorConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            fast_threshold: 20,
            patch_size: 31,
            pattern_seed: 42,
        }
    }
}

/// A detected corner with its contrast score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPoint {
    /// Pixel column
    pub x: f32,
    /// Pixel row
    pub y: f32,
    /// FAST corner score
    pub score: u32,
}

impl KeyPoint {
    /// The keypoint position as a point.
    #[inline]
    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Keypoints and their descriptors for one frame.
///
/// The two vectors run parallel: `descriptors[i]` describes `keypoints[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    pub keypoints: Vec<KeyPoint>,
    pub descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    /// Number of features in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Whether the set holds no features.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// FAST corner detector combined with BRIEF description.
///
/// The comparison pattern is drawn once at construction; extraction is a
/// pure function of the frame, so repeated calls on the same frame return
/// identical feature sets.
pub struct FeatureExtractor {
    config: FeatureExtractorConfig,
    pattern: BriefPattern,
}

impl FeatureExtractor {
    /// Build an extractor, generating the descriptor pattern from the
    /// configured seed.
    pub fn new(config: FeatureExtractorConfig) -> Self {
        let pattern = BriefPattern::generate(config.patch_size, config.pattern_seed);
        Self { config, pattern }
    }

    /// Detect, suppress, rank and describe corners in one frame.
    ///
    /// Detection stays far enough inside the frame that every surviving
    /// keypoint has a full descriptor patch. Survivors are ordered by score
    /// descending with position as tie-break, then capped at
    /// `max_features`.
    pub fn extract(&self, frame: &GrayFrame) -> FeatureSet {
        let margin = (self.config.patch_size / 2).max(3);
        let raw = fast::detect_corners(frame, self.config.fast_threshold, margin);
        let mut corners = fast::suppress_non_maxima(&raw, frame.width(), frame.height());

        corners.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.y.cmp(&b.y))
                .then(a.x.cmp(&b.x))
        });
        corners.truncate(self.config.max_features);

        let mut features = FeatureSet::default();
        for corner in corners {
            features.keypoints.push(KeyPoint {
                x: corner.x as f32,
                y: corner.y as f32,
                score: corner.score,
            });
            features
                .descriptors
                .push(brief::describe(frame, corner.x, corner.y, &self.pattern));
        }
        features
    }

    /// The active configuration.
    pub fn config(&self) -> &FeatureExtractorConfig {
        &self.config
    }
}
