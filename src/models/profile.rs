//! User matching preferences.

use super::RemoteType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default minimum final score for a job to be reported.
pub const DEFAULT_MIN_SCORE_THRESHOLD: f64 = 0.3;
/// Default weight of the semantic similarity signal.
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.55;
/// Default weight of the keyword signal.
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.30;
/// Default weight of the recency signal.
pub const DEFAULT_RECENCY_WEIGHT: f64 = 0.15;

/// A user's job matching preferences.
///
/// All keyword lists are matched case-insensitively on whole words.
/// Weights are not required to sum to 1 but conventionally do.
///
/// # Example
///
/// ```rust
/// use jobsift::models::{MatchingProfile, RemoteType};
///
/// let profile: MatchingProfile = toml::from_str(r#"
///     desired_roles = ["Backend Engineer"]
///     must_not_keywords = ["senior"]
///     remote_preference = "remote"
/// "#).unwrap();
///
/// assert_eq!(profile.remote_preference, Some(RemoteType::Remote));
/// assert!((profile.vector_weight - 0.55).abs() < f64::EPSILON);
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingProfile {
    /// Profile name, for logs.
    pub name: String,
    /// Target job titles, matched against the posting title.
    pub desired_roles: Vec<String>,
    /// Keywords the posting should mention.
    pub must_have_keywords: Vec<String>,
    /// Keywords that exclude a posting outright.
    pub must_not_keywords: Vec<String>,
    /// Preferred locations, matched as substrings of the posting location.
    pub preferred_locations: Vec<String>,
    /// Preferred remote arrangement.
    pub remote_preference: Option<RemoteType>,
    /// Minimum final score for a job to be reported.
    pub min_score_threshold: f64,
    /// Weight of the semantic similarity signal.
    pub vector_weight: f64,
    /// Weight of the keyword signal.
    pub keyword_weight: f64,
    /// Weight of the recency signal.
    pub recency_weight: f64,
}

impl Default for MatchingProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            desired_roles: Vec::new(),
            must_have_keywords: Vec::new(),
            must_not_keywords: Vec::new(),
            preferred_locations: Vec::new(),
            remote_preference: None,
            min_score_threshold: DEFAULT_MIN_SCORE_THRESHOLD,
            vector_weight: DEFAULT_VECTOR_WEIGHT,
            keyword_weight: DEFAULT_KEYWORD_WEIGHT,
            recency_weight: DEFAULT_RECENCY_WEIGHT,
        }
    }
}

impl MatchingProfile {
    /// Checks the profile for configuration errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] if the threshold is outside `[0, 1]`,
    /// a weight is negative or not finite, or any list entry is blank.
    pub fn validate(&self) -> Result<()> {
        if !self.min_score_threshold.is_finite() || !(0.0..=1.0).contains(&self.min_score_threshold)
        {
            return Err(invalid(format!(
                "min_score_threshold must be within [0, 1], got {}",
                self.min_score_threshold
            )));
        }

        for (field, weight) in [
            ("vector_weight", self.vector_weight),
            ("keyword_weight", self.keyword_weight),
            ("recency_weight", self.recency_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "{field} must be a finite non-negative number, got {weight}"
                )));
            }
        }

        for (field, entries) in [
            ("desired_roles", &self.desired_roles),
            ("must_have_keywords", &self.must_have_keywords),
            ("must_not_keywords", &self.must_not_keywords),
            ("preferred_locations", &self.preferred_locations),
        ] {
            if let Some(index) = entries.iter().position(|e| e.trim().is_empty()) {
                return Err(invalid(format!("{field}[{index}] is blank")));
            }
        }

        Ok(())
    }

    /// Text embedded once per scorer to represent the profile.
    ///
    /// Desired roles followed by must-have keywords. Empty when both lists are.
    #[must_use]
    pub fn profile_text(&self) -> String {
        self.desired_roles
            .iter()
            .chain(&self.must_have_keywords)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sum of the three signal weights.
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.vector_weight + self.keyword_weight + self.recency_weight
    }
}

fn invalid(reason: String) -> Error {
    Error::InvalidProfile { reason }
}
