//! Scored job results.

use super::JobPosting;
use serde::Serialize;

/// A job posting with its match score breakdown.
///
/// Every score lies in `[0, 1]`. Excluded postings carry `final_score` and
/// `keyword_score` of 0 and no other signal is computed for them.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredJobPosting {
    /// The scored posting.
    pub job: JobPosting,
    /// Weighted combination of the three signals.
    pub final_score: f64,
    /// Semantic similarity between the profile and the posting.
    pub vector_score: f64,
    /// Keyword rule score.
    pub keyword_score: f64,
    /// Posting freshness.
    pub recency_score: f64,
    /// Human-readable explanation, in signal order.
    pub match_reasons: Vec<String>,
    /// Whether a must-not keyword excluded the posting.
    pub excluded: bool,
}

impl ScoredJobPosting {
    /// Creates a result for a posting excluded by a must-not keyword.
    #[must_use]
    pub const fn excluded(job: JobPosting, reasons: Vec<String>) -> Self {
        Self {
            job,
            final_score: 0.0,
            vector_score: 0.0,
            keyword_score: 0.0,
            recency_score: 0.0,
            match_reasons: reasons,
            excluded: true,
        }
    }
}
