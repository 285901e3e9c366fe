//! # Jobsift
//!
//! Job posting deduplication and multi-signal ranking.
//!
//! Jobsift takes normalized job postings produced by source adapters, drops
//! duplicates, and ranks what is left against a user's matching profile.
//!
//! ## Features
//!
//! - SimHash fingerprints for approximate duplicate detection
//! - Exact, externally-persisted, and fuzzy duplicate checks in one pass
//! - Keyword rules with must-not short-circuiting
//! - Concave recency decay
//! - Pluggable semantic similarity (Ollama, `OpenAI`, on-device `FastEmbed`)
//! - Explainable scores with per-signal breakdown and match reasons
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use jobsift::embedding::NeutralEmbedder;
//! use jobsift::models::{JobPosting, MatchingProfile, SourceSystem};
//! use jobsift::services::{Deduplicator, DeduplicationConfig, Scorer};
//!
//! let profile = MatchingProfile {
//!     desired_roles: vec!["Backend Engineer".to_string()],
//!     must_have_keywords: vec!["rust".to_string()],
//!     ..MatchingProfile::default()
//! };
//!
//! let jobs = vec![
//!     JobPosting::new("Acme", SourceSystem::Greenhouse, "1", "Backend Engineer")
//!         .with_description("Write Rust services"),
//!     JobPosting::new("Acme", SourceSystem::Greenhouse, "1", "Backend Engineer"),
//! ];
//!
//! let dedup = Deduplicator::new(DeduplicationConfig::default()).unwrap();
//! let unique = dedup.dedupe(jobs);
//! assert_eq!(unique.len(), 1);
//!
//! let scorer = Scorer::new(profile, Arc::new(NeutralEmbedder::new())).unwrap();
//! let ranked = scorer.score_batch(&unique, Some(0.0));
//! assert_eq!(ranked.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod embedding;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use config::JobsiftConfig;
pub use embedding::EmbeddingProvider;
pub use models::{
    EmploymentType, JobId, JobPosting, MatchingProfile, RemoteType, ScoredJobPosting,
    SourceSystem,
};
pub use services::{DeduplicationConfig, Deduplicator, KeywordScorer, RecencyScorer, Scorer};

/// Error type for jobsift operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed arguments, unparsable time filters, bad fingerprint widths |
/// | `InvalidProfile` | Matching profile fails validation at scorer construction |
/// | `OperationFailed` | Embedding backends fail, HTTP or file I/O errors |
/// | `FeatureNotEnabled` | Using a backend that requires a compile-time feature |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A time filter like `"7x"` cannot be parsed
    /// - A fingerprint width is outside `1..=64`
    /// - A job file does not contain a JSON array of postings
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The matching profile is malformed.
    ///
    /// Raised when:
    /// - `min_score_threshold` is outside `[0, 1]`
    /// - A signal weight is negative or not finite
    /// - A keyword, role, or location entry is blank
    ///
    /// Fatal to the scorer being constructed.
    #[error("invalid matching profile: {reason}")]
    InvalidProfile {
        /// Why the profile was rejected.
        reason: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - An embedding backend returns an error status or malformed body
    /// - An HTTP request times out or cannot connect
    /// - A configuration or job file cannot be read
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    ///
    /// Raised when the on-device embedding backend is used without the
    /// `fastembed-embeddings` feature compiled in.
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for jobsift operations.
pub type Result<T> = std::result::Result<T, Error>;
