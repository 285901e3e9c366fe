//! Deduplication service.
//!
//! Runs the three duplicate checks in order and stops at the first match:
//! 1. **Exact key**: `company:source_system:source_job_id` seen this session
//! 2. **Existing record**: the caller's [`ExistenceCheck`] knows the job ID
//! 3. **Fuzzy match**: same normalized title and location, and a SimHash of
//!    the searchable text within the similarity threshold
//!
//! A posting that passes all three is recorded so later postings in the same
//! session are checked against it.

use super::config::DeduplicationConfig;
use super::normalize::normalize;
use super::simhash::SimHasher;
use super::types::{DuplicateCheckResult, ExistenceCheck};
use crate::Result;
use crate::models::{JobId, JobPosting};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::instrument;

/// Per-session dedup state.
#[derive(Debug, Default)]
struct SessionState {
    /// Exact keys of every recorded posting.
    seen_exact: HashSet<String>,
    /// Fuzzy key to the fingerprint of the most recent posting recorded
    /// under it. Earlier fingerprints for the same key are overwritten.
    fuzzy: HashMap<String, u64>,
}

/// Session-scoped duplicate detector for job postings.
///
/// All state lives behind a single mutex and each check holds it from the
/// first lookup to the final insert, so concurrent callers never interleave
/// inside one check. Decisions still depend on call order: [`dedupe`]
/// processes its input sequentially and earlier postings win.
///
/// Lock poisoning is recovered from rather than propagated; the state is a
/// pair of sets that a panic cannot leave half-updated in a harmful way.
///
/// [`dedupe`]: Deduplicator::dedupe
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
/// use std::sync::Arc;
/// use jobsift::models::{JobId, JobPosting, SourceSystem};
/// use jobsift::services::deduplication::{
///     DeduplicationConfig, Deduplicator, DuplicateReason,
/// };
///
/// let stored = JobPosting::new("Acme", SourceSystem::Lever, "7", "Data Engineer");
/// let known: HashSet<JobId> = [stored.id()].into_iter().collect();
///
/// let dedup = Deduplicator::new(DeduplicationConfig::default())
///     .unwrap()
///     .with_existence_check(Arc::new(known));
///
/// let result = dedup.check(&stored);
/// assert_eq!(result.reason, Some(DuplicateReason::ExistingRecord));
/// ```
pub struct Deduplicator {
    config: DeduplicationConfig,
    hasher: SimHasher,
    existence: Option<Arc<dyn ExistenceCheck>>,
    state: Mutex<SessionState>,
}

impl Deduplicator {
    /// Creates a deduplicator with empty session state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if the threshold or fingerprint
    /// width is out of range.
    pub fn new(config: DeduplicationConfig) -> Result<Self> {
        config.validate()?;
        let hasher = SimHasher::new(config.fingerprint_bits)?;
        Ok(Self {
            config,
            hasher,
            existence: None,
            state: Mutex::new(SessionState::default()),
        })
    }

    /// Adds a cross-run existence check.
    #[must_use]
    pub fn with_existence_check(mut self, check: Arc<dyn ExistenceCheck>) -> Self {
        self.existence = Some(check);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Coarse bucket scoping fingerprint comparisons.
    #[must_use]
    pub fn fuzzy_key(job: &JobPosting) -> String {
        format!(
            "{}:{}",
            normalize(job.title()),
            normalize(job.location().unwrap_or(""))
        )
    }

    /// Checks a posting and records it when unique.
    #[instrument(
        skip(self, job),
        fields(
            operation = "dedup_check",
            company = %job.company(),
            source = %job.source_system(),
            source_job_id = %job.source_job_id()
        )
    )]
    pub fn check(&self, job: &JobPosting) -> DuplicateCheckResult {
        let job_id = job.id();

        if !self.config.enabled {
            tracing::debug!("Deduplication disabled, skipping check");
            return DuplicateCheckResult::unique(job_id);
        }

        let exact_key = job.exact_key();
        if self.lock_state().seen_exact.contains(&exact_key) {
            return Self::exact_key_duplicate(&exact_key, job_id);
        }

        // The lookup may hit storage, so it runs without the session lock.
        if let Some(existence) = &self.existence
            && existence.contains_job(&job_id)
        {
            tracing::debug!(job_id = %job_id, "Posting already stored");
            record_duplicate_metric("existing_record");
            return DuplicateCheckResult::existing_record(job_id);
        }

        let fuzzy_key = Self::fuzzy_key(job);
        let fingerprint = self.hasher.fingerprint(&job.searchable_text());

        let mut state = self.lock_state();
        // Another caller may have recorded the key while the lock was free.
        if state.seen_exact.contains(&exact_key) {
            return Self::exact_key_duplicate(&exact_key, job_id);
        }

        if let Some(&previous) = state.fuzzy.get(&fuzzy_key) {
            let score = self.hasher.similarity(fingerprint, previous);
            if score >= self.config.similarity_threshold {
                tracing::debug!(
                    fuzzy_key = %fuzzy_key,
                    score = score,
                    "Fuzzy duplicate"
                );
                record_duplicate_metric("fuzzy_match");
                return DuplicateCheckResult::fuzzy_match(job_id, score);
            }
        }

        state.seen_exact.insert(exact_key);
        state.fuzzy.insert(fuzzy_key, fingerprint);
        drop(state);

        metrics::counter!("dedup_checks_total", "result" => "unique").increment(1);
        DuplicateCheckResult::unique(job_id)
    }

    fn exact_key_duplicate(exact_key: &str, job_id: JobId) -> DuplicateCheckResult {
        tracing::debug!(exact_key = %exact_key, "Exact key duplicate");
        record_duplicate_metric("exact_key");
        DuplicateCheckResult::exact_key(job_id)
    }

    /// Returns true if the posting duplicates one seen before.
    ///
    /// Unique postings are recorded, so calling this twice with the same
    /// posting returns `false` then `true`.
    pub fn is_duplicate(&self, job: &JobPosting) -> bool {
        self.check(job).is_duplicate
    }

    /// Filters `jobs` down to the unique postings, preserving order.
    ///
    /// Earlier postings win over later duplicates.
    #[instrument(skip(self, jobs), fields(operation = "dedupe", input = jobs.len()))]
    pub fn dedupe(&self, jobs: Vec<JobPosting>) -> Vec<JobPosting> {
        let unique: Vec<JobPosting> = jobs
            .into_iter()
            .filter(|job| !self.is_duplicate(job))
            .collect();
        tracing::debug!(unique = unique.len(), "Deduplicated batch");
        unique
    }

    /// Clears all session state, starting a fresh scan.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.seen_exact.clear();
        state.fuzzy.clear();
    }

    /// Number of unique postings recorded this session.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.lock_state().seen_exact.len()
    }
}

impl std::fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deduplicator")
            .field("config", &self.config)
            .field("has_existence_check", &self.existence.is_some())
            .field("seen", &self.seen_count())
            .finish_non_exhaustive()
    }
}

fn record_duplicate_metric(reason: &'static str) {
    metrics::counter!("dedup_checks_total", "result" => "duplicate", "reason" => reason)
        .increment(1);
}
