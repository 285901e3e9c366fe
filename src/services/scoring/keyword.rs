//! Keyword rule scoring.
//!
//! Matchers are compiled once per profile. Phrases match case-insensitively
//! on word boundaries, so `"java"` does not match `"javascript"`.

use crate::models::{JobPosting, MatchingProfile, RemoteType};
use crate::{Error, Result};
use regex::Regex;

/// Score for a desired role found in the title.
const ROLE_MATCH_SCORE: f64 = 0.4;
/// Score when every must-have keyword is present.
const KEYWORD_MATCH_SCORE: f64 = 0.4;
/// Flat score when the profile has no must-have keywords.
const NO_KEYWORDS_BONUS: f64 = 0.2;
/// Score for a preferred location.
const LOCATION_MATCH_SCORE: f64 = 0.1;
/// Score for the preferred remote arrangement.
const REMOTE_MATCH_SCORE: f64 = 0.1;

/// A compiled whole-word phrase.
#[derive(Debug, Clone)]
struct PhraseMatcher {
    phrase: String,
    pattern: Regex,
}

impl PhraseMatcher {
    fn new(phrase: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).map_err(|e| {
            Error::InvalidProfile {
                reason: format!("cannot compile matcher for '{phrase}': {e}"),
            }
        })?;
        Ok(Self {
            phrase: phrase.to_string(),
            pattern,
        })
    }

    fn compile_all(phrases: &[String]) -> Result<Vec<Self>> {
        phrases.iter().map(|p| Self::new(p)).collect()
    }

    fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Outcome of keyword scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    /// Score in `[0, 1]`.
    pub score: f64,
    /// One reason per contributing rule.
    pub reasons: Vec<String>,
    /// Whether a must-not phrase excluded the posting.
    pub excluded: bool,
}

impl KeywordMatch {
    fn excluded(phrase: &str) -> Self {
        Self {
            score: 0.0,
            reasons: vec![format!("Excluded: contains '{phrase}'")],
            excluded: true,
        }
    }
}

/// Scores postings against a profile's keyword rules.
///
/// | Rule | Score | Reason |
/// |------|-------|--------|
/// | must-not phrase anywhere | 0, stop | `Excluded: contains '<phrase>'` |
/// | first desired role in title | +0.4 | `Role match: <role>` |
/// | must-have keywords | +0.4 × matched / total | `Keyword: <kw>` per match |
/// | no must-have keywords configured | +0.2 | |
/// | first preferred location in location | +0.1 | `Location: <loc>` |
/// | remote preference met | +0.1 | `Remote: <type>` |
///
/// # Example
///
/// ```rust
/// use jobsift::models::{JobPosting, MatchingProfile, SourceSystem};
/// use jobsift::services::KeywordScorer;
///
/// let profile = MatchingProfile {
///     desired_roles: vec!["Backend Engineer".to_string()],
///     must_not_keywords: vec!["senior".to_string()],
///     ..MatchingProfile::default()
/// };
/// let scorer = KeywordScorer::new(&profile).unwrap();
///
/// let job = JobPosting::new("Acme", SourceSystem::Lever, "1", "Senior Backend Engineer");
/// let result = scorer.score(&job);
/// assert!(result.excluded);
/// assert_eq!(result.score, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    must_have: Vec<PhraseMatcher>,
    must_not: Vec<PhraseMatcher>,
    desired_roles: Vec<PhraseMatcher>,
    preferred_locations: Vec<String>,
    remote_preference: Option<RemoteType>,
}

impl KeywordScorer {
    /// Compiles the profile's keyword rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfile`] if a phrase cannot be compiled.
    pub fn new(profile: &MatchingProfile) -> Result<Self> {
        Ok(Self {
            must_have: PhraseMatcher::compile_all(&profile.must_have_keywords)?,
            must_not: PhraseMatcher::compile_all(&profile.must_not_keywords)?,
            desired_roles: PhraseMatcher::compile_all(&profile.desired_roles)?,
            preferred_locations: profile.preferred_locations.clone(),
            remote_preference: profile.remote_preference,
        })
    }

    /// Returns the first must-not phrase found in the posting.
    #[must_use]
    pub fn exclusion(&self, job: &JobPosting) -> Option<&str> {
        let text = job.searchable_text();
        self.must_not
            .iter()
            .find(|m| m.is_match(&text))
            .map(|m| m.phrase.as_str())
    }

    /// Scores a posting.
    #[must_use]
    pub fn score(&self, job: &JobPosting) -> KeywordMatch {
        let text = job.searchable_text();

        if let Some(matcher) = self.must_not.iter().find(|m| m.is_match(&text)) {
            return KeywordMatch::excluded(&matcher.phrase);
        }

        let mut score = 0.0;
        let mut reasons = Vec::new();

        if let Some(role) = self.desired_roles.iter().find(|m| m.is_match(job.title())) {
            score += ROLE_MATCH_SCORE;
            reasons.push(format!("Role match: {}", role.phrase));
        }

        if self.must_have.is_empty() {
            score += NO_KEYWORDS_BONUS;
        } else {
            let mut matched = 0usize;
            for keyword in self.must_have.iter().filter(|m| m.is_match(&text)) {
                matched += 1;
                reasons.push(format!("Keyword: {}", keyword.phrase));
            }
            #[allow(clippy::cast_precision_loss)]
            let fraction = matched as f64 / self.must_have.len() as f64;
            score += KEYWORD_MATCH_SCORE * fraction;
        }

        if let Some(location) = job.location() {
            let location = location.to_lowercase();
            if let Some(preferred) = self
                .preferred_locations
                .iter()
                .find(|p| location.contains(&p.to_lowercase()))
            {
                score += LOCATION_MATCH_SCORE;
                reasons.push(format!("Location: {preferred}"));
            }
        }

        if self.remote_preference == Some(job.remote_type()) {
            score += REMOTE_MATCH_SCORE;
            reasons.push(format!("Remote: {}", job.remote_type()));
        }

        KeywordMatch {
            score: score.clamp(0.0, 1.0),
            reasons,
            excluded: false,
        }
    }
}
