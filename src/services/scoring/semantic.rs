//! Semantic-only job matching.
//!
//! Ranks postings purely by embedding similarity to a descriptive profile
//! text, for callers that want "jobs like this" without keyword rules.

use super::profile_embedding::ProfileEmbedding;
use crate::Result;
use crate::embedding::EmbeddingProvider;
use crate::models::{JobPosting, MatchingProfile};
use std::sync::Arc;
use tracing::instrument;

/// Maximum description characters included in a job's text.
const MAX_DESCRIPTION_CHARS: usize = 2000;
/// Maximum requirements included in a job's text.
const MAX_REQUIREMENTS: usize = 10;
/// Maximum highlights per match.
const MAX_HIGHLIGHTS: usize = 5;
/// Similarity reported when no semantic backend is configured.
const NEUTRAL_SIMILARITY: f64 = 0.5;

/// A posting ranked by semantic similarity.
#[derive(Debug, Clone)]
pub struct VectorMatch {
    /// The matched posting.
    pub job: JobPosting,
    /// Similarity rescaled to `[0, 1]`.
    pub similarity: f64,
    /// 1-based rank.
    pub rank: usize,
    /// Profile elements the posting visibly matches.
    pub highlights: Vec<String>,
}

/// Matches postings to a profile by embedding similarity.
pub struct SemanticMatcher {
    profile: MatchingProfile,
    provider: Arc<dyn EmbeddingProvider>,
    profile_embedding: ProfileEmbedding,
}

impl SemanticMatcher {
    /// Creates a matcher.
    #[must_use]
    pub fn new(profile: MatchingProfile, provider: Arc<dyn EmbeddingProvider>) -> Self {
        let text = Self::profile_text(&profile);
        Self {
            profile,
            provider,
            profile_embedding: ProfileEmbedding::new(text),
        }
    }

    /// Descriptive text embedded for the profile.
    #[must_use]
    pub fn profile_text(profile: &MatchingProfile) -> String {
        let mut parts = Vec::new();
        if !profile.desired_roles.is_empty() {
            parts.push(format!(
                "Looking for roles like: {}",
                profile.desired_roles.join(", ")
            ));
        }
        if !profile.must_have_keywords.is_empty() {
            parts.push(format!(
                "Required skills: {}",
                profile.must_have_keywords.join(", ")
            ));
        }
        if !profile.preferred_locations.is_empty() {
            parts.push(format!(
                "Preferred locations: {}",
                profile.preferred_locations.join(", ")
            ));
        }
        if let Some(remote) = profile.remote_preference {
            parts.push(format!("Work style: {remote}"));
        }
        parts.join(" ")
    }

    /// Descriptive text embedded for a posting.
    #[must_use]
    pub fn job_text(job: &JobPosting) -> String {
        let mut parts = vec![job.title().to_string()];
        if let Some(department) = job.department() {
            parts.push(format!("Department: {department}"));
        }
        if let Some(location) = job.location() {
            parts.push(format!("Location: {location}"));
        }
        parts.push(format!("Work style: {}", job.remote_type()));
        if !job.description_text().is_empty() {
            parts.push(
                job.description_text()
                    .chars()
                    .take(MAX_DESCRIPTION_CHARS)
                    .collect(),
            );
        }
        if !job.requirements().is_empty() {
            let requirements: Vec<&str> = job
                .requirements()
                .iter()
                .take(MAX_REQUIREMENTS)
                .map(String::as_str)
                .collect();
            parts.push(format!("Requirements: {}", requirements.join(", ")));
        }
        parts.join(" ")
    }

    /// Similarity of one posting to the profile, in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn similarity(&self, job: &JobPosting) -> Result<f64> {
        if self.provider.is_neutral() {
            return Ok(NEUTRAL_SIMILARITY);
        }
        let profile = self.profile_embedding.get(self.provider.as_ref())?;
        if profile.is_empty() {
            return Ok(NEUTRAL_SIMILARITY);
        }
        let text = Self::job_text(job);
        let vectors = self.provider.embed(&[text.as_str()])?;
        Ok(vectors
            .first()
            .map_or(NEUTRAL_SIMILARITY, |v| self.rescaled(&profile, v)))
    }

    fn rescaled(&self, profile: &[f32], job: &[f32]) -> f64 {
        let similarity = f64::from(self.provider.similarity(profile, job));
        if !similarity.is_finite() {
            tracing::warn!(provider = self.provider.name(), "Non-finite similarity");
            return NEUTRAL_SIMILARITY;
        }
        ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// Ranks postings by similarity, keeping those at or above
    /// `min_similarity`.
    ///
    /// With a neutral provider every posting is returned in input order
    /// with similarity 0.5. All job texts go to the provider in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    #[instrument(skip(self, jobs), fields(operation = "semantic_match", jobs = jobs.len()))]
    pub fn match_jobs(
        &self,
        jobs: &[JobPosting],
        min_similarity: f64,
    ) -> Result<Vec<VectorMatch>> {
        if self.provider.is_neutral() {
            return Ok(jobs
                .iter()
                .enumerate()
                .map(|(i, job)| VectorMatch {
                    job: job.clone(),
                    similarity: NEUTRAL_SIMILARITY,
                    rank: i + 1,
                    highlights: vec!["Embeddings not available".to_string()],
                })
                .collect());
        }

        let profile = self.profile_embedding.get(self.provider.as_ref())?;
        if profile.is_empty() || jobs.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = jobs.iter().map(Self::job_text).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.provider.embed(&refs)?;

        let mut matches: Vec<VectorMatch> = jobs
            .iter()
            .zip(&vectors)
            .map(|(job, vector)| (job, self.rescaled(&profile, vector)))
            .filter(|(_, similarity)| *similarity >= min_similarity)
            .map(|(job, similarity)| VectorMatch {
                job: job.clone(),
                similarity,
                rank: 0,
                highlights: self.highlights(job),
            })
            .collect();

        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        for (i, m) in matches.iter_mut().enumerate() {
            m.rank = i + 1;
        }
        Ok(matches)
    }

    /// Profile elements visible in the posting, at most five.
    #[must_use]
    pub fn highlights(&self, job: &JobPosting) -> Vec<String> {
        let mut highlights = Vec::new();
        let text = format!(
            "{} {} {}",
            job.title(),
            job.description_text(),
            job.location().unwrap_or("")
        )
        .to_lowercase();

        for keyword in &self.profile.must_have_keywords {
            if text.contains(&keyword.to_lowercase()) {
                highlights.push(format!("Contains: {keyword}"));
            }
        }

        let title = job.title().to_lowercase();
        if let Some(role) = self
            .profile
            .desired_roles
            .iter()
            .find(|r| title.contains(&r.to_lowercase()))
        {
            highlights.push(format!("Role match: {role}"));
        }

        if let Some(location) = job.location().map(str::to_lowercase)
            && let Some(preferred) = self
                .profile
                .preferred_locations
                .iter()
                .find(|l| location.contains(&l.to_lowercase()))
        {
            highlights.push(format!("Location: {preferred}"));
        }

        if self.profile.remote_preference == Some(job.remote_type()) {
            highlights.push(format!("Remote: {}", job.remote_type()));
        }

        highlights.truncate(MAX_HIGHLIGHTS);
        highlights
    }
}
