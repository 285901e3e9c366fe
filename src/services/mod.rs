//! Business logic services.
//!
//! Services are synchronous and hold no long-lived state beyond one scan:
//! [`Deduplicator`] keeps the postings seen this session, [`Scorer`] caches
//! one profile embedding.

pub mod deduplication;
pub mod scoring;

pub use deduplication::{
    DeduplicationConfig, Deduplicator, DuplicateCheckResult, DuplicateReason, ExistenceCheck,
};
pub use scoring::{
    Freshness, KeywordMatch, KeywordScorer, RecencyScorer, Scorer, SemanticMatcher, VectorMatch,
};
