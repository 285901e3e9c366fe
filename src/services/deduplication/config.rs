//! Deduplication configuration.

use super::simhash::DEFAULT_FINGERPRINT_BITS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default fingerprint similarity at or above which two postings with the
/// same fuzzy key are duplicates.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Configuration for the deduplicator.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `JOBSIFT_DEDUP_ENABLED` | bool | `true` | Enable deduplication |
/// | `JOBSIFT_DEDUP_THRESHOLD` | f64 | `0.85` | Fuzzy match similarity threshold |
/// | `JOBSIFT_DEDUP_FINGERPRINT_BITS` | u32 | `64` | SimHash width |
///
/// # Example
///
/// ```rust
/// use jobsift::services::deduplication::DeduplicationConfig;
///
/// let config = DeduplicationConfig::default().with_similarity_threshold(0.9);
/// assert!(config.enabled);
/// assert!((config.similarity_threshold - 0.9).abs() < f64::EPSILON);
/// assert_eq!(config.fingerprint_bits, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeduplicationConfig {
    /// Enable/disable deduplication entirely.
    pub enabled: bool,

    /// Fingerprint similarity threshold for fuzzy matches, in `[0, 1]`.
    pub similarity_threshold: f64,

    /// SimHash fingerprint width, in `1..=64`.
    pub fingerprint_bits: u32,
}

impl DeduplicationConfig {
    /// Applies environment variable overrides on top of `self`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("JOBSIFT_DEDUP_ENABLED") {
            self.enabled = !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off");
        }
        if let Some(threshold) = std::env::var("JOBSIFT_DEDUP_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.similarity_threshold = threshold;
        }
        if let Some(bits) = std::env::var("JOBSIFT_DEDUP_FINGERPRINT_BITS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.fingerprint_bits = bits;
        }
        self
    }

    /// Checks that the threshold and width are in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the threshold is outside `[0, 1]`
    /// or the width is outside `1..=64`.
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(Error::InvalidInput(format!(
                "dedup similarity threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.fingerprint_bits == 0 || self.fingerprint_bits > u64::BITS {
            return Err(Error::InvalidInput(format!(
                "fingerprint width must be within 1..=64 bits, got {}",
                self.fingerprint_bits
            )));
        }
        Ok(())
    }

    /// Builder method to set enabled state.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set the fuzzy match threshold.
    #[must_use]
    pub const fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Builder method to set the fingerprint width.
    #[must_use]
    pub const fn with_fingerprint_bits(mut self, bits: u32) -> Self {
        self.fingerprint_bits = bits;
        self
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            fingerprint_bits: DEFAULT_FINGERPRINT_BITS,
        }
    }
}
