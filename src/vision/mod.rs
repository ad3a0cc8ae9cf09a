//! Sparse visual feature front-end.
//!
//! Contents:
//! - [`fast`]: FAST segment-test corner detection with non-max suppression
//! - [`brief`]: seeded BRIEF binary descriptors and Hamming distance
//! - [`extractor`]: detection, ranking and description combined per frame
//! - [`matcher`]: cross-checked nearest-neighbor matching

pub mod brief;
pub mod extractor;
pub mod fast;
pub mod matcher;

pub use brief::{hamming_distance, BriefPattern, Descriptor, DESCRIPTOR_BITS, DESCRIPTOR_BYTES};
pub use extractor::{FeatureExtractor, FeatureExtractorConfig, FeatureSet, KeyPoint};
pub use matcher::{Correspondence, FeatureMatcher, MatcherConfig};
