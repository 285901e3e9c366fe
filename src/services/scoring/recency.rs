//! Recency scoring.

use crate::models::JobPosting;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Default age at which a posting stops earning recency score.
pub const DEFAULT_MAX_AGE_DAYS: f64 = 30.0;

/// Score for postings without a publication date.
pub const NEUTRAL_RECENCY_SCORE: f64 = 0.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Scores postings by age with a concave decay.
///
/// `1 - sqrt(age / max_age)`: same-day postings stay near 1.0 and the
/// score drops fastest early on. Undated postings get the neutral 0.5,
/// future-dated ones (clock skew) get 1.0.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use jobsift::models::{JobPosting, SourceSystem};
/// use jobsift::services::RecencyScorer;
///
/// let now = Utc::now();
/// let scorer = RecencyScorer::default();
/// let job = JobPosting::new("Acme", SourceSystem::Lever, "1", "SRE")
///     .with_posted_at(now - Duration::hours(1));
///
/// assert!(scorer.score_at(&job, now) > 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyScorer {
    max_age_days: f64,
}

impl RecencyScorer {
    /// Creates a scorer that reaches 0 at `max_age_days`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `max_age_days` is not a positive
    /// finite number.
    pub fn new(max_age_days: f64) -> Result<Self> {
        if max_age_days.is_finite() && max_age_days > 0.0 {
            Ok(Self { max_age_days })
        } else {
            Err(Error::InvalidInput(format!(
                "recency_max_age_days must be a positive number, got {max_age_days}"
            )))
        }
    }

    /// Age in days at which the score reaches 0.
    #[must_use]
    pub const fn max_age_days(&self) -> f64 {
        self.max_age_days
    }

    /// Scores a posting against the current time.
    #[must_use]
    pub fn score(&self, job: &JobPosting) -> f64 {
        self.score_at(job, Utc::now())
    }

    /// Scores a posting as of `now`.
    #[must_use]
    pub fn score_at(&self, job: &JobPosting, now: DateTime<Utc>) -> f64 {
        let Some(posted_at) = job.posted_at() else {
            return NEUTRAL_RECENCY_SCORE;
        };

        #[allow(clippy::cast_precision_loss)]
        let age_days = (now - posted_at).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;

        if age_days <= 0.0 {
            return 1.0;
        }
        if age_days >= self.max_age_days {
            return 0.0;
        }
        (1.0 - (age_days / self.max_age_days).sqrt()).clamp(0.0, 1.0)
    }
}

impl Default for RecencyScorer {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceSystem;
    use chrono::Duration;

    fn posted(now: DateTime<Utc>, age: Duration) -> JobPosting {
        JobPosting::new("Acme", SourceSystem::Lever, "1", "Engineer").with_posted_at(now - age)
    }

    #[test]
    fn test_one_hour_old_is_fresh() {
        let now = Utc::now();
        assert!(RecencyScorer::default().score_at(&posted(now, Duration::hours(1)), now) > 0.9);
    }

    #[test]
    fn test_twenty_five_days_old_is_stale() {
        let now = Utc::now();
        assert!(RecencyScorer::default().score_at(&posted(now, Duration::days(25)), now) < 0.3);
    }

    #[test]
    fn test_missing_date_is_neutral() {
        let job = JobPosting::new("Acme", SourceSystem::Lever, "1", "Engineer");
        assert!((RecencyScorer::default().score(&job) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_future_and_now_score_one() {
        let now = Utc::now();
        let scorer = RecencyScorer::default();
        assert!((scorer.score_at(&posted(now, Duration::zero()), now) - 1.0).abs() < f64::EPSILON);
        assert!((scorer.score_at(&posted(now, -Duration::days(2)), now) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_at_or_beyond_max_age_scores_zero() {
        let now = Utc::now();
        let scorer = RecencyScorer::new(10.0).expect("valid window");
        assert!(scorer.score_at(&posted(now, Duration::days(10)), now).abs() < f64::EPSILON);
        assert!(scorer.score_at(&posted(now, Duration::days(400)), now).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quarter_window_scores_half() {
        let now = Utc::now();
        let scorer = RecencyScorer::new(8.0).expect("valid window");
        let score = scorer.score_at(&posted(now, Duration::days(2)), now);
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_monotonically_decreasing() {
        let now = Utc::now();
        let scorer = RecencyScorer::default();
        let scores: Vec<f64> = [1, 2, 5, 10, 20, 29]
            .iter()
            .map(|d| scorer.score_at(&posted(now, Duration::days(*d)), now))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_invalid_window_rejected() {
        for days in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(RecencyScorer::new(days), Err(Error::InvalidInput(_))));
        }
        let scorer = RecencyScorer::new(14.0).expect("valid window");
        assert!((scorer.max_age_days() - 14.0).abs() < f64::EPSILON);
    }
}
