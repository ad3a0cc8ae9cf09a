//! BRIEF binary descriptors.
//!
//! Each descriptor packs 256 pairwise intensity comparisons from a fixed
//! sampling pattern into 32 bytes. The pattern is drawn once from a seeded
//! RNG, so two extractors built with the same seed and patch size produce
//! bit-identical descriptors for the same patch.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::GrayFrame;

/// Number of intensity comparisons per descriptor.
pub const DESCRIPTOR_BITS: usize = 256;

/// Descriptor length in bytes.
pub const DESCRIPTOR_BYTES: usize = DESCRIPTOR_BITS / 8;

/// A packed 256-bit BRIEF descriptor.
pub type Descriptor = [u8; DESCRIPTOR_BYTES];

/// The fixed comparison pattern: offset pairs within the sampling patch.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefPattern {
    pairs: Vec<((i32, i32), (i32, i32))>,
    half: i32,
}

impl BriefPattern {
    /// Draw a comparison pattern from a seeded RNG.
    ///
    /// Offsets are sampled uniformly in `[-patch_size / 2, patch_size / 2]`
    /// on both axes.
    pub fn generate(patch_size: usize, seed: u64) -> Self {
        let half = (patch_size / 2) as i32;
        let mut rng = StdRng::seed_from_u64(seed);
        let pairs = (0..DESCRIPTOR_BITS)
            .map(|_| {
                let a = (
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                );
                let b = (
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                );
                (a, b)
            })
            .collect();
        Self { pairs, half }
    }

    /// Maximum offset magnitude on either axis.
    #[inline]
    pub fn half_patch(&self) -> i32 {
        self.half
    }
}

/// Compute the descriptor for the patch centered at `(x, y)`.
///
/// Bit `i` is set when the first sample of pair `i` is darker than the
/// second. Bits are packed most-significant first.
///
/// # Panics
/// Panics when `(x, y)` is closer than `pattern.half_patch()` to a frame
/// edge.
pub fn describe(frame: &GrayFrame, x: usize, y: usize, pattern: &BriefPattern) -> Descriptor {
    let mut desc = [0u8; DESCRIPTOR_BYTES];
    for (i, &((ax, ay), (bx, by))) in pattern.pairs.iter().enumerate() {
        let a = frame.get((x as i32 + ax) as usize, (y as i32 + ay) as usize);
        let b = frame.get((x as i32 + bx) as usize, (y as i32 + by) as usize);
        if a < b {
            desc[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    desc
}

/// Number of differing bits between two descriptors.
#[inline]
pub fn hamming_distance(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}
