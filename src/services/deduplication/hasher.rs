//! SHA-256 hashing for job identity and fingerprint words.
//!
//! Both uses need a hash that is stable across processes and platforms, so
//! `std`'s `DefaultHasher` is out.

use sha2::{Digest, Sha256};

/// Number of hex characters kept for a job ID (64 bits).
pub const JOB_ID_HEX_LEN: usize = 16;

/// Hashing helpers for deduplication.
///
/// # Example
///
/// ```rust
/// use jobsift::services::deduplication::ContentHasher;
///
/// let id = ContentHasher::job_id("Acme:greenhouse:123");
/// assert_eq!(id.len(), 16);
/// assert_eq!(id, ContentHasher::job_id("Acme:greenhouse:123"));
/// ```
pub struct ContentHasher;

impl ContentHasher {
    /// Computes the lowercase hex SHA-256 of `content`.
    #[must_use]
    pub fn hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Derives a job ID from an exact key.
    ///
    /// The full SHA-256 truncated to [`JOB_ID_HEX_LEN`] hex characters.
    #[must_use]
    pub fn job_id(exact_key: &str) -> String {
        let mut hash = Self::hash(exact_key);
        hash.truncate(JOB_ID_HEX_LEN);
        hash
    }

    /// Hashes a single word for SimHash accumulation.
    ///
    /// Returns the low 64 bits of the digest read as a big-endian integer.
    #[must_use]
    pub fn word_hash(word: &str) -> u64 {
        let digest = Sha256::digest(word.as_bytes());
        let mut low = [0u8; 8];
        low.copy_from_slice(&digest[digest.len() - 8..]);
        u64::from_be_bytes(low)
    }
}
