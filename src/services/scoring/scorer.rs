//! Multi-signal scoring pipeline.
//!
//! ```text
//! job ──► keyword rules ──► excluded? ──yes──► final 0, stop
//!                               │ no
//!                               ▼
//!                   recency + semantic similarity
//!                               │
//!                               ▼
//!        final = vw·vector + kw·keyword + rw·recency (clamped)
//! ```

use super::keyword::{KeywordMatch, KeywordScorer};
use super::profile_embedding::ProfileEmbedding;
use super::recency::RecencyScorer;
use crate::Result;
use crate::embedding::{EmbeddingProvider, ensure_count};
use crate::models::{JobPosting, MatchingProfile, ScoredJobPosting};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

/// Vector score used whenever semantic similarity cannot be computed.
pub const NEUTRAL_VECTOR_SCORE: f64 = 0.5;
/// Default number of job texts sent to the provider per call.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Vector score above which a semantic reason is reported.
const HIGH_SIMILARITY_THRESHOLD: f64 = 0.6;
/// Recency score above which a recency reason is reported.
const RECENT_THRESHOLD: f64 = 0.7;

/// Scores and ranks postings against one profile.
///
/// Keyword exclusion always wins: an excluded posting gets a final score of
/// 0 and no other signal is computed. Embedding failures never propagate;
/// the affected postings get the neutral vector score.
///
/// The profile embedding is computed once per scorer. Call
/// [`precompute_profile_embedding`](Self::precompute_profile_embedding)
/// before fanning out across threads to pay that cost up front.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use jobsift::embedding::NeutralEmbedder;
/// use jobsift::models::{JobPosting, MatchingProfile, SourceSystem};
/// use jobsift::services::Scorer;
///
/// let profile = MatchingProfile {
///     desired_roles: vec!["Backend Engineer".to_string()],
///     must_not_keywords: vec!["clearance".to_string()],
///     min_score_threshold: 0.1,
///     ..MatchingProfile::default()
/// };
/// let scorer = Scorer::new(profile, Arc::new(NeutralEmbedder::new())).unwrap();
///
/// let jobs = vec![
///     JobPosting::new("Acme", SourceSystem::Lever, "1", "Backend Engineer"),
///     JobPosting::new("Acme", SourceSystem::Lever, "2", "Backend Engineer")
///         .with_description("Security clearance required"),
/// ];
/// let ranked = scorer.score_batch(&jobs, None);
///
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].job.source_job_id(), "1");
/// ```
pub struct Scorer {
    profile: MatchingProfile,
    keyword: KeywordScorer,
    recency: RecencyScorer,
    provider: Arc<dyn EmbeddingProvider>,
    profile_embedding: ProfileEmbedding,
    batch_size: usize,
}

impl Scorer {
    /// Creates a scorer for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidProfile`] if the profile fails
    /// validation or a keyword cannot be compiled.
    pub fn new(profile: MatchingProfile, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        profile.validate()?;
        let keyword = KeywordScorer::new(&profile)?;
        let profile_embedding = ProfileEmbedding::new(profile.profile_text());
        tracing::debug!(
            profile = %profile.name,
            provider = provider.name(),
            "Created scorer"
        );
        Ok(Self {
            profile,
            keyword,
            recency: RecencyScorer::default(),
            provider,
            profile_embedding,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Replaces the recency scorer.
    #[must_use]
    pub const fn with_recency(mut self, recency: RecencyScorer) -> Self {
        self.recency = recency;
        self
    }

    /// Sets how many job texts go to the provider per call. Minimum 1.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Returns the profile.
    #[must_use]
    pub const fn profile(&self) -> &MatchingProfile {
        &self.profile
    }

    /// Returns the embedding provider.
    #[must_use]
    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    /// Returns the embedding batch size.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Computes and caches the profile embedding now.
    ///
    /// A no-op for neutral providers or once the embedding is cached.
    ///
    /// # Errors
    ///
    /// Returns the provider's error. Nothing is cached on failure.
    pub fn precompute_profile_embedding(&self) -> Result<()> {
        if self.provider.is_neutral() {
            return Ok(());
        }
        self.profile_embedding.get(self.provider.as_ref()).map(|_| ())
    }

    /// Scores one posting as of the current time.
    pub fn score(&self, job: &JobPosting) -> ScoredJobPosting {
        self.score_at(job, Utc::now())
    }

    /// Scores one posting as of `now`.
    #[instrument(
        skip(self, job, now),
        fields(operation = "score", company = %job.company(), title = %job.title())
    )]
    pub fn score_at(&self, job: &JobPosting, now: DateTime<Utc>) -> ScoredJobPosting {
        let keyword = self.keyword.score(job);
        if keyword.excluded {
            return self.excluded(job, keyword);
        }
        let vector = self.vector_score(job);
        self.combine(job, keyword, vector, now)
    }

    /// Scores postings, keeps those at or above `min_score`, and sorts them
    /// by final score, highest first.
    ///
    /// `None` uses the profile's threshold. Equal scores keep input order.
    pub fn score_batch(
        &self,
        jobs: &[JobPosting],
        min_score: Option<f64>,
    ) -> Vec<ScoredJobPosting> {
        self.score_batch_at(jobs, min_score, Utc::now())
    }

    /// [`score_batch`](Self::score_batch) as of `now`.
    ///
    /// Non-excluded job texts are embedded in chunks of the batch size, one
    /// provider call per chunk. A failed chunk degrades only its own jobs.
    #[instrument(skip(self, jobs, now), fields(operation = "score_batch", jobs = jobs.len()))]
    pub fn score_batch_at(
        &self,
        jobs: &[JobPosting],
        min_score: Option<f64>,
        now: DateTime<Utc>,
    ) -> Vec<ScoredJobPosting> {
        let threshold = min_score.unwrap_or(self.profile.min_score_threshold);

        let keywords: Vec<KeywordMatch> = jobs.iter().map(|job| self.keyword.score(job)).collect();
        let candidates: Vec<&JobPosting> = jobs
            .iter()
            .zip(&keywords)
            .filter(|(_, k)| !k.excluded)
            .map(|(job, _)| job)
            .collect();
        let mut vectors = self.batch_vector_scores(&candidates).into_iter();

        let mut scored: Vec<ScoredJobPosting> = jobs
            .iter()
            .zip(keywords)
            .map(|(job, keyword)| {
                if keyword.excluded {
                    self.excluded(job, keyword)
                } else {
                    let vector = vectors.next().unwrap_or(NEUTRAL_VECTOR_SCORE);
                    self.combine(job, keyword, vector, now)
                }
            })
            .filter(|s| s.final_score >= threshold)
            .collect();

        // sort_by is stable, so ties keep input order.
        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        tracing::debug!(kept = scored.len(), threshold, "Scored batch");
        scored
    }

    fn excluded(&self, job: &JobPosting, keyword: KeywordMatch) -> ScoredJobPosting {
        tracing::debug!(reasons = ?keyword.reasons, "Posting excluded");
        metrics::counter!("scoring_jobs_total", "outcome" => "excluded").increment(1);
        ScoredJobPosting::excluded(job.clone(), keyword.reasons)
    }

    fn combine(
        &self,
        job: &JobPosting,
        keyword: KeywordMatch,
        vector_score: f64,
        now: DateTime<Utc>,
    ) -> ScoredJobPosting {
        let recency_score = self.recency.score_at(job, now);
        let keyword_score = keyword.score;

        let final_score = (self.profile.vector_weight * vector_score
            + self.profile.keyword_weight * keyword_score
            + self.profile.recency_weight * recency_score)
            .clamp(0.0, 1.0);

        let mut match_reasons = keyword.reasons;
        if vector_score > HIGH_SIMILARITY_THRESHOLD {
            match_reasons.push(format!("High semantic similarity: {vector_score:.2}"));
        }
        if recency_score > RECENT_THRESHOLD {
            match_reasons.push("Recently posted".to_string());
        }

        metrics::counter!("scoring_jobs_total", "outcome" => "scored").increment(1);
        ScoredJobPosting {
            job: job.clone(),
            final_score,
            vector_score,
            keyword_score,
            recency_score,
            match_reasons,
            excluded: false,
        }
    }

    /// Maps cosine similarity to `[0, 1]`. Non-finite values are neutral.
    fn rescale(&self, profile: &[f32], job: &[f32]) -> f64 {
        let similarity = f64::from(self.provider.similarity(profile, job));
        if !similarity.is_finite() {
            tracing::warn!(
                provider = self.provider.name(),
                similarity,
                "Non-finite similarity, using neutral vector score"
            );
            metrics::counter!("embedding_failures_total", "provider" => self.provider.name())
                .increment(1);
            return NEUTRAL_VECTOR_SCORE;
        }
        ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    fn record_failure(&self, error: &crate::Error, jobs: usize) {
        tracing::warn!(
            provider = self.provider.name(),
            error = %error,
            jobs,
            "Embedding failed, using neutral vector score"
        );
        metrics::counter!("embedding_failures_total", "provider" => self.provider.name())
            .increment(1);
    }

    /// The profile embedding, or `None` when the vector signal is neutral.
    fn usable_profile_embedding(&self, jobs: usize) -> Option<Arc<Vec<f32>>> {
        if self.provider.is_neutral() {
            return None;
        }
        match self.profile_embedding.get(self.provider.as_ref()) {
            Ok(embedding) if embedding.is_empty() => None,
            Ok(embedding) => Some(embedding),
            Err(e) => {
                self.record_failure(&e, jobs);
                None
            },
        }
    }

    fn vector_score(&self, job: &JobPosting) -> f64 {
        let Some(profile) = self.usable_profile_embedding(1) else {
            return NEUTRAL_VECTOR_SCORE;
        };
        let text = job.searchable_text();
        match self.provider.embed(&[text.as_str()]) {
            Ok(vectors) => vectors
                .first()
                .map_or(NEUTRAL_VECTOR_SCORE, |v| self.rescale(&profile, v)),
            Err(e) => {
                self.record_failure(&e, 1);
                NEUTRAL_VECTOR_SCORE
            },
        }
    }

    fn batch_vector_scores(&self, jobs: &[&JobPosting]) -> Vec<f64> {
        if jobs.is_empty() {
            return Vec::new();
        }
        let Some(profile) = self.usable_profile_embedding(jobs.len()) else {
            return vec![NEUTRAL_VECTOR_SCORE; jobs.len()];
        };

        let mut scores = Vec::with_capacity(jobs.len());
        for chunk in jobs.chunks(self.batch_size) {
            let texts: Vec<String> = chunk.iter().map(|job| job.searchable_text()).collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let embedded = self
                .provider
                .embed(&refs)
                .and_then(|vectors| ensure_count("embed_batch", chunk.len(), vectors));
            match embedded {
                Ok(vectors) => scores.extend(vectors.iter().map(|v| self.rescale(&profile, v))),
                Err(e) => {
                    self.record_failure(&e, chunk.len());
                    scores.extend(std::iter::repeat_n(NEUTRAL_VECTOR_SCORE, chunk.len()));
                },
            }
        }
        scores
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("profile", &self.profile.name)
            .field("provider", &self.provider.name())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
