//! Mutual best descriptor matching.

use serde::{Deserialize, Serialize};

use crate::vision::brief::{hamming_distance, Descriptor};
use crate::vision::extractor::FeatureSet;

/// Configuration for feature matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// Minimum keypoints required in both frames before matching runs
    pub min_keypoints: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { min_keypoints: 6 }
    }
}

/// One accepted match between consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correspondence {
    /// Index into the previous frame's feature set
    pub prev_idx: usize,
    /// Index into the current frame's feature set
    pub curr_idx: usize,
    /// Hamming distance between the matched descriptors
    pub distance: u32,
}

/// Cross-checked nearest-neighbor matcher over Hamming distance.
///
/// A pair is accepted only when each descriptor is the other's single best
/// match. Ties on distance resolve to the lowest index, which keeps the
/// output deterministic.
pub struct FeatureMatcher {
    config: MatcherConfig,
}

impl FeatureMatcher {
    /// Create a matcher.
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Match two feature sets, returning mutual best pairs.
    ///
    /// Returns an empty list when either set is empty or smaller than
    /// `min_keypoints`.
    pub fn match_features(&self, prev: &FeatureSet, curr: &FeatureSet) -> Vec<Correspondence> {
        if prev.is_empty() || curr.is_empty() {
            return Vec::new();
        }
        if prev.len() < self.config.min_keypoints || curr.len() < self.config.min_keypoints {
            return Vec::new();
        }

        let forward: Vec<(usize, u32)> = prev
            .descriptors
            .iter()
            .map(|d| best_match(d, &curr.descriptors))
            .collect();
        let backward: Vec<(usize, u32)> = curr
            .descriptors
            .iter()
            .map(|d| best_match(d, &prev.descriptors))
            .collect();

        let mut matches = Vec::new();
        for (prev_idx, &(curr_idx, distance)) in forward.iter().enumerate() {
            if backward[curr_idx].0 == prev_idx {
                matches.push(Correspondence {
                    prev_idx,
                    curr_idx,
                    distance,
                });
            }
        }
        matches
    }

    /// The active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }
}

/// Index and distance of the closest descriptor in `candidates`.
///
/// `candidates` must be non-empty. Ties keep the earliest index.
fn best_match(query: &Descriptor, candidates: &[Descriptor]) -> (usize, u32) {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, candidate) in candidates.iter().enumerate() {
        let dist = hamming_distance(query, candidate);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    (best_idx, best_dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::brief::DESCRIPTOR_BYTES;
    use crate::vision::extractor::KeyPoint;

    /// Build a feature set from hand-written descriptors, with keypoint
    /// positions equal to the descriptor index.
    fn feature_set(descriptors: Vec<Descriptor>) -> FeatureSet {
        let keypoints = (0..descriptors.len())
            .map(|i| KeyPoint {
                x: i as f32,
                y: i as f32,
                score: 1,
            })
            .collect();
        FeatureSet {
            keypoints,
            descriptors,
        }
    }

    /// Descriptor with the given number of leading one-bits.
    fn descriptor_with_ones(ones: usize) -> Descriptor {
        let mut d = [0u8; DESCRIPTOR_BYTES];
        for bit in 0..ones {
            d[bit / 8] |= 1 << (7 - (bit % 8));
        }
        d
    }

    fn permissive_matcher() -> FeatureMatcher {
        FeatureMatcher::new(MatcherConfig { min_keypoints: 1 })
    }

    #[test]
    fn test_identical_sets_match_one_to_one() {
        let set = feature_set(vec![
            descriptor_with_ones(0),
            descriptor_with_ones(100),
            descriptor_with_ones(200),
        ]);
        let matches = permissive_matcher().match_features(&set, &set);

        assert_eq!(matches.len(), 3);
        for m in &matches {
            assert_eq!(m.prev_idx, m.curr_idx);
            assert_eq!(m.distance, 0);
        }
    }

    #[test]
    fn test_cross_check_rejects_one_sided_match() {
        // Both prev descriptors are nearest to curr[0]; only prev[0] is
        // curr[0]'s best, so prev[1] gets nothing
        let prev = feature_set(vec![descriptor_with_ones(0), descriptor_with_ones(2)]);
        let curr = feature_set(vec![descriptor_with_ones(0), descriptor_with_ones(128)]);
        let matches = permissive_matcher().match_features(&prev, &curr);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].prev_idx, 0);
        assert_eq!(matches[0].curr_idx, 0);
    }

    #[test]
    fn test_distance_ties_resolve_to_lowest_index() {
        // curr[0] and curr[1] are identical, both at distance 0 from prev[0]
        let prev = feature_set(vec![descriptor_with_ones(16)]);
        let curr = feature_set(vec![descriptor_with_ones(16), descriptor_with_ones(16)]);
        let matches = permissive_matcher().match_features(&prev, &curr);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].curr_idx, 0);
    }

    #[test]
    fn test_empty_sets_yield_no_matches() {
        let empty = FeatureSet::default();
        let set = feature_set(vec![descriptor_with_ones(8)]);
        let matcher = permissive_matcher();

        assert!(matcher.match_features(&empty, &set).is_empty());
        assert!(matcher.match_features(&set, &empty).is_empty());
        assert!(matcher.match_features(&empty, &empty).is_empty());
    }

    #[test]
    fn test_min_keypoints_gate() {
        let small = feature_set(vec![descriptor_with_ones(0), descriptor_with_ones(64)]);
        let matcher = FeatureMatcher::new(MatcherConfig::default());
        // Default requires 6 keypoints on both sides
        assert!(matcher.match_features(&small, &small).is_empty());

        let large = feature_set(
            (0..6).map(|i| descriptor_with_ones(i * 40)).collect(),
        );
        assert_eq!(matcher.match_features(&large, &large).len(), 6);
    }

    #[test]
    fn test_reported_distance_is_hamming() {
        let prev = feature_set(vec![descriptor_with_ones(0)]);
        let curr = feature_set(vec![descriptor_with_ones(5)]);
        let matches = permissive_matcher().match_features(&prev, &curr);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].distance, 5);
    }
}
