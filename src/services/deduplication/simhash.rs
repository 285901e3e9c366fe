//! SimHash fingerprints.
//!
//! A SimHash maps a bag of words to a fixed-width integer such that texts
//! with similar vocabularies land at a small Hamming distance from each
//! other. Each word is hashed, every bit position accumulates +1 when the
//! word hash has that bit set and -1 otherwise, and the fingerprint keeps
//! the bits whose accumulator ended up positive.

use super::hasher::ContentHasher;
use super::normalize::normalize;
use crate::{Error, Result};

/// Default fingerprint width in bits.
pub const DEFAULT_FINGERPRINT_BITS: u32 = 64;

/// Computes SimHash fingerprints of a fixed width.
///
/// # Example
///
/// ```rust
/// use jobsift::services::deduplication::SimHasher;
///
/// let hasher = SimHasher::default();
/// let a = hasher.fingerprint("Software Engineer position in San Francisco");
/// let b = hasher.fingerprint("Software Engineer role in San Francisco Bay Area");
/// assert!(hasher.similarity(a, b) > 0.7);
/// assert!((hasher.similarity(a, a) - 1.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimHasher {
    bits: u32,
}

impl SimHasher {
    /// Creates a hasher producing `bits`-wide fingerprints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `bits` is within `1..=64`.
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > u64::BITS {
            return Err(Error::InvalidInput(format!(
                "fingerprint width must be within 1..=64 bits, got {bits}"
            )));
        }
        Ok(Self { bits })
    }

    /// Fingerprint width in bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    const fn mask(&self) -> u64 {
        if self.bits == u64::BITS {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        }
    }

    /// Fingerprints `text`.
    ///
    /// Text without any words after normalization fingerprints to 0.
    #[must_use]
    pub fn fingerprint(&self, text: &str) -> u64 {
        let normalized = normalize(text);
        let mut accumulators = [0i64; u64::BITS as usize];
        let width = self.bits as usize;
        let mut saw_word = false;

        for word in normalized.split_whitespace() {
            saw_word = true;
            let hash = ContentHasher::word_hash(word);
            for (i, acc) in accumulators.iter_mut().take(width).enumerate() {
                if hash & (1u64 << i) == 0 {
                    *acc -= 1;
                } else {
                    *acc += 1;
                }
            }
        }

        if !saw_word {
            return 0;
        }

        accumulators
            .iter()
            .take(width)
            .enumerate()
            .filter(|(_, acc)| **acc > 0)
            .fold(0u64, |fp, (i, _)| fp | (1u64 << i))
    }

    /// Number of differing bits between two fingerprints.
    #[must_use]
    pub const fn hamming_distance(&self, a: u64, b: u64) -> u32 {
        ((a ^ b) & self.mask()).count_ones()
    }

    /// Similarity in `[0, 1]`: `1 - hamming_distance / bits`.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub fn similarity(&self, a: u64, b: u64) -> f64 {
        1.0 - f64::from(self.hamming_distance(a, b)) / f64::from(self.bits)
    }
}

impl Default for SimHasher {
    fn default() -> Self {
        Self {
            bits: DEFAULT_FINGERPRINT_BITS,
        }
    }
}

/// Fingerprints `text` with the default 64-bit width.
#[must_use]
pub fn fingerprint(text: &str) -> u64 {
    SimHasher::default().fingerprint(text)
}

/// Similarity of two 64-bit fingerprints.
#[must_use]
pub fn similarity(a: u64, b: u64) -> f64 {
    SimHasher::default().similarity(a, b)
}
