//! Duplicate detection for job postings.
//!
//! The same posting often reaches a scan more than once: twice from one
//! source, re-posted under a new ID, or mirrored on another ATS. Three
//! checks catch these, cheapest first:
//! 1. **Exact key**: identity tuple seen earlier in the session
//! 2. **Existing record**: caller-supplied lookup against persistent storage
//! 3. **Fuzzy match**: SimHash fingerprint comparison within a bucket of
//!    postings sharing a normalized title and location
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Deduplicator                            │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────────┐ │
//! │  │ Exact key    │  │ Existence    │  │ Fuzzy key bucket       │ │
//! │  │ set          │  │ check        │  │                        │ │
//! │  │              │  │              │  │ latest SimHash per     │ │
//! │  │ session only │  │ cross-run    │  │ title:location         │ │
//! │  └──────────────┘  └──────────────┘  └────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use jobsift::models::{JobPosting, SourceSystem};
//! use jobsift::services::deduplication::{DeduplicationConfig, Deduplicator};
//!
//! let dedup = Deduplicator::new(DeduplicationConfig::default()).unwrap();
//! let job = JobPosting::new("Acme", SourceSystem::Ashby, "42", "SRE");
//!
//! assert!(!dedup.is_duplicate(&job));
//! assert!(dedup.is_duplicate(&job));
//! ```

mod config;
mod hasher;
mod normalize;
mod service;
mod simhash;
mod types;

pub use config::{DEFAULT_SIMILARITY_THRESHOLD, DeduplicationConfig};
pub use hasher::{ContentHasher, JOB_ID_HEX_LEN};
pub use normalize::normalize;
pub use service::Deduplicator;
pub use simhash::{DEFAULT_FINGERPRINT_BITS, SimHasher, fingerprint, similarity};
pub use types::{DuplicateCheckResult, DuplicateReason, ExistenceCheck};
