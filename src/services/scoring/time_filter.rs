//! Time-window filtering and freshness labels.

use crate::models::JobPosting;
use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// `<count><unit>` with unit hours, days, weeks, or 30-day months.
static TIME_FILTER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(\d+)([hdwm])$").ok());

/// Parses a window like `"24h"`, `"7d"`, `"2w"`, or `"1m"`.
///
/// A month is 30 days.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for anything else.
///
/// # Example
///
/// ```rust
/// use chrono::TimeDelta;
/// use jobsift::services::scoring::parse_time_filter;
///
/// assert_eq!(parse_time_filter("2w").unwrap(), TimeDelta::days(14));
/// assert!(parse_time_filter("soon").is_err());
/// ```
pub fn parse_time_filter(filter: &str) -> Result<TimeDelta> {
    let normalized = filter.trim().to_lowercase();
    let invalid = || {
        Error::InvalidInput(format!(
            "invalid time filter '{filter}', use a format like 24h, 7d, 2w, 1m"
        ))
    };

    let captures = TIME_FILTER
        .as_ref()
        .and_then(|re| re.captures(&normalized))
        .ok_or_else(invalid)?;
    let value: i64 = captures[1].parse().map_err(|_| invalid())?;

    let delta = match &captures[2] {
        "h" => TimeDelta::try_hours(value),
        "d" => TimeDelta::try_days(value),
        "w" => TimeDelta::try_weeks(value),
        "m" => value.checked_mul(30).and_then(TimeDelta::try_days),
        _ => None,
    };
    delta.ok_or_else(invalid)
}

/// Earliest publication time that passes `filter`, as of `now`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the filter cannot be parsed.
pub fn cutoff_time(filter: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let delta = parse_time_filter(filter)?;
    now.checked_sub_signed(delta)
        .ok_or_else(|| Error::InvalidInput(format!("time filter '{filter}' is out of range")))
}

/// Keeps postings published at or after the cutoff.
///
/// Undated postings are kept since their age cannot be checked.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the filter cannot be parsed.
pub fn filter_jobs_by_time(
    jobs: Vec<JobPosting>,
    filter: &str,
    now: DateTime<Utc>,
) -> Result<Vec<JobPosting>> {
    let cutoff = cutoff_time(filter, now)?;
    let before = jobs.len();
    let kept: Vec<JobPosting> = jobs
        .into_iter()
        .filter(|job| job.posted_at().is_none_or(|posted| posted >= cutoff))
        .collect();
    tracing::debug!(filter, before, kept = kept.len(), "Applied time filter");
    Ok(kept)
}

/// Coarse age bucket for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    /// Under 24 hours old.
    New,
    /// Under 3 days old.
    Fresh,
    /// Under a week old.
    ThisWeek,
    /// Under 30 days old.
    ThisMonth,
    /// 30 days or older.
    Older,
    /// No publication date.
    Unknown,
}

impl Freshness {
    /// Buckets a publication time as of `now`.
    #[must_use]
    pub fn from_posted_at(posted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(posted_at) = posted_at else {
            return Self::Unknown;
        };
        let age = now - posted_at;
        if age < TimeDelta::hours(24) {
            Self::New
        } else if age < TimeDelta::days(3) {
            Self::Fresh
        } else if age < TimeDelta::days(7) {
            Self::ThisWeek
        } else if age < TimeDelta::days(30) {
            Self::ThisMonth
        } else {
            Self::Older
        }
    }

    /// Buckets a posting as of `now`.
    #[must_use]
    pub fn of(job: &JobPosting, now: DateTime<Utc>) -> Self {
        Self::from_posted_at(job.posted_at(), now)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::New => "New (today)",
            Self::Fresh => "Fresh (< 3 days)",
            Self::ThisWeek => "This week",
            Self::ThisMonth => "This month",
            Self::Older => "Older",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceSystem;
    use test_case::test_case;

    #[test_case("24h", TimeDelta::hours(24); "hours")]
    #[test_case("1h", TimeDelta::hours(1); "one hour")]
    #[test_case("7d", TimeDelta::days(7); "days")]
    #[test_case("2w", TimeDelta::weeks(2); "weeks")]
    #[test_case("1m", TimeDelta::days(30); "month is thirty days")]
    #[test_case(" 3M ", TimeDelta::days(90); "trimmed and case insensitive")]
    fn test_parse_time_filter(input: &str, expected: TimeDelta) {
        assert_eq!(parse_time_filter(input).expect("parse"), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("7"; "missing unit")]
    #[test_case("d7"; "unit first")]
    #[test_case("7y"; "unknown unit")]
    #[test_case("-1d"; "negative")]
    #[test_case("99999999999999999999d"; "overflow")]
    fn test_parse_time_filter_rejects(input: &str) {
        assert!(matches!(
            parse_time_filter(input),
            Err(Error::InvalidInput(_))
        ));
    }

    fn job(id: &str, posted_at: Option<DateTime<Utc>>) -> JobPosting {
        let job = JobPosting::new("Acme", SourceSystem::Lever, id, "Engineer");
        match posted_at {
            Some(at) => job.with_posted_at(at),
            None => job,
        }
    }

    #[test]
    fn test_filter_keeps_recent_and_undated() {
        let now = Utc::now();
        let jobs = vec![
            job("fresh", Some(now - TimeDelta::hours(2))),
            job("old", Some(now - TimeDelta::days(10))),
            job("undated", None),
            job("edge", Some(now - TimeDelta::days(7))),
        ];

        let kept = filter_jobs_by_time(jobs, "7d", now).expect("filter");
        let ids: Vec<&str> = kept.iter().map(JobPosting::source_job_id).collect();
        assert_eq!(ids, ["fresh", "undated", "edge"]);
    }

    #[test]
    fn test_filter_rejects_bad_window() {
        assert!(filter_jobs_by_time(Vec::new(), "week", Utc::now()).is_err());
    }

    #[test]
    fn test_cutoff_time() {
        let now = Utc::now();
        assert_eq!(cutoff_time("1d", now).expect("cutoff"), now - TimeDelta::days(1));
    }

    #[test_case(Some(TimeDelta::hours(1)), Freshness::New)]
    #[test_case(Some(TimeDelta::days(2)), Freshness::Fresh)]
    #[test_case(Some(TimeDelta::days(5)), Freshness::ThisWeek)]
    #[test_case(Some(TimeDelta::days(20)), Freshness::ThisMonth)]
    #[test_case(Some(TimeDelta::days(45)), Freshness::Older)]
    #[test_case(None, Freshness::Unknown)]
    fn test_freshness(age: Option<TimeDelta>, expected: Freshness) {
        let now = Utc::now();
        assert_eq!(Freshness::from_posted_at(age.map(|a| now - a), now), expected);
    }

    #[test]
    fn test_freshness_label() {
        assert_eq!(Freshness::ThisWeek.to_string(), "This week");
    }
}
