//! Deduplication result types.

use crate::models::JobId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of a deduplication check.
///
/// # Example
///
/// ```rust
/// use jobsift::models::JobId;
/// use jobsift::services::deduplication::{DuplicateCheckResult, DuplicateReason};
///
/// let result = DuplicateCheckResult::fuzzy_match(JobId::new("0123456789abcdef"), 0.94);
///
/// assert!(result.is_duplicate);
/// assert_eq!(result.reason, Some(DuplicateReason::FuzzyMatch));
/// assert_eq!(result.similarity_score, Some(0.94));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    /// Whether the posting is a duplicate.
    pub is_duplicate: bool,

    /// Which check identified the duplicate.
    pub reason: Option<DuplicateReason>,

    /// Fingerprint similarity for fuzzy matches (0.0 to 1.0).
    pub similarity_score: Option<f64>,

    /// ID of the checked posting.
    pub job_id: JobId,
}

impl DuplicateCheckResult {
    /// Creates a result indicating the posting is unique.
    #[must_use]
    pub const fn unique(job_id: JobId) -> Self {
        Self {
            is_duplicate: false,
            reason: None,
            similarity_score: None,
            job_id,
        }
    }

    /// Creates a result for a posting whose exact key was already seen.
    #[must_use]
    pub const fn exact_key(job_id: JobId) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::ExactKey),
            similarity_score: None,
            job_id,
        }
    }

    /// Creates a result for a posting already known to persistent storage.
    #[must_use]
    pub const fn existing_record(job_id: JobId) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::ExistingRecord),
            similarity_score: None,
            job_id,
        }
    }

    /// Creates a result for a fingerprint match under the same fuzzy key.
    #[must_use]
    pub const fn fuzzy_match(job_id: JobId, score: f64) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::FuzzyMatch),
            similarity_score: Some(score),
            job_id,
        }
    }
}

/// The reason a posting was identified as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Same company, source system, and source job ID seen this session.
    ExactKey,

    /// The external existence check already knows the job ID.
    ExistingRecord,

    /// Same normalized title and location with a near-identical fingerprint.
    FuzzyMatch,
}

impl DuplicateReason {
    /// Returns the reason as a static label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExactKey => "exact_key",
            Self::ExistingRecord => "existing_record",
            Self::FuzzyMatch => "fuzzy_match",
        }
    }
}

impl std::fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-run existence check, usually backed by persistent storage.
///
/// Implemented for closures and for a plain set of IDs. The deduplicator
/// calls it without holding its session lock, so an implementation may
/// block on I/O or call back into the same deduplicator.
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use jobsift::models::JobId;
/// use jobsift::services::deduplication::ExistenceCheck;
///
/// let stored: HashSet<JobId> = [JobId::new("aaaa")].into_iter().collect();
/// assert!(stored.contains_job(&JobId::new("aaaa")));
///
/// let never = |_: &JobId| false;
/// assert!(!never.contains_job(&JobId::new("aaaa")));
/// ```
pub trait ExistenceCheck: Send + Sync {
    /// Returns true if a posting with this ID was stored before.
    fn contains_job(&self, id: &JobId) -> bool;
}

impl<F> ExistenceCheck for F
where
    F: Fn(&JobId) -> bool + Send + Sync,
{
    fn contains_job(&self, id: &JobId) -> bool {
        self(id)
    }
}

impl ExistenceCheck for HashSet<JobId> {
    fn contains_job(&self, id: &JobId) -> bool {
        self.contains(id)
    }
}
