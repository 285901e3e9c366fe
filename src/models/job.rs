//! Job posting types.

use super::{EmploymentType, RemoteType, SourceSystem};
use crate::services::deduplication::ContentHasher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a job posting.
///
/// Derived from the posting's exact key, so the same posting seen on two
/// different runs gets the same ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a job ID from an already-computed string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A normalized job posting from any source.
///
/// Postings are immutable once built: fields are only reachable through
/// accessors, and the builder methods consume `self`. Adapters either build
/// them with [`JobPosting::new`] and the `with_*` methods or deserialize them
/// from JSON.
///
/// # Example
///
/// ```rust
/// use jobsift::models::{JobPosting, RemoteType, SourceSystem};
///
/// let job = JobPosting::new("Acme", SourceSystem::Lever, "abc-123", "Platform Engineer")
///     .with_location("Berlin, Germany")
///     .with_remote_type(RemoteType::Hybrid)
///     .with_description("Own our Kubernetes platform.");
///
/// assert_eq!(job.exact_key(), "Acme:lever:abc-123");
/// assert_eq!(job.id().as_str().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    company: String,
    title: String,
    source_job_id: String,
    #[serde(default)]
    source_system: SourceSystem,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    apply_url: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    remote_type: RemoteType,
    #[serde(default)]
    employment_type: EmploymentType,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    description_text: String,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    seniority: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    /// Original payload for debugging. Never interpreted.
    #[serde(default, alias = "raw")]
    raw_payload: serde_json::Map<String, serde_json::Value>,
}

impl JobPosting {
    /// Creates a posting from its identity fields and title.
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        source_system: SourceSystem,
        source_job_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            title: title.into(),
            source_job_id: source_job_id.into(),
            source_system,
            source_url: None,
            apply_url: None,
            location: None,
            remote_type: RemoteType::Unknown,
            employment_type: EmploymentType::Unknown,
            department: None,
            team: None,
            posted_at: None,
            updated_at: None,
            description_text: String::new(),
            requirements: Vec::new(),
            seniority: None,
            keywords: Vec::new(),
            raw_payload: serde_json::Map::new(),
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the remote work arrangement.
    #[must_use]
    pub const fn with_remote_type(mut self, remote_type: RemoteType) -> Self {
        self.remote_type = remote_type;
        self
    }

    /// Sets the employment type.
    #[must_use]
    pub const fn with_employment_type(mut self, employment_type: EmploymentType) -> Self {
        self.employment_type = employment_type;
        self
    }

    /// Sets the department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets the team.
    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Sets when the posting was published.
    #[must_use]
    pub const fn with_posted_at(mut self, posted_at: DateTime<Utc>) -> Self {
        self.posted_at = Some(posted_at);
        self
    }

    /// Sets when the posting was last updated by the source.
    #[must_use]
    pub const fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Sets the plain-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description_text = description.into();
        self
    }

    /// Sets the requirement bullet points.
    #[must_use]
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the posting and application URLs.
    #[must_use]
    pub fn with_urls(mut self, source_url: impl Into<String>, apply_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self.apply_url = Some(apply_url.into());
        self
    }

    /// Sets the seniority label reported by the source.
    #[must_use]
    pub fn with_seniority(mut self, seniority: impl Into<String>) -> Self {
        self.seniority = Some(seniority.into());
        self
    }

    /// Sets source-provided keyword tags.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches the original source payload.
    #[must_use]
    pub fn with_raw_payload(mut self, raw: serde_json::Map<String, serde_json::Value>) -> Self {
        self.raw_payload = raw;
        self
    }

    /// Company name.
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    /// Job title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Job ID as assigned by the source. Opaque.
    #[must_use]
    pub fn source_job_id(&self) -> &str {
        &self.source_job_id
    }

    /// Source system the posting came from.
    #[must_use]
    pub const fn source_system(&self) -> SourceSystem {
        self.source_system
    }

    /// Public posting URL, if known.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Application URL, if known.
    #[must_use]
    pub fn apply_url(&self) -> Option<&str> {
        self.apply_url.as_deref()
    }

    /// Location, if stated.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Remote work arrangement.
    #[must_use]
    pub const fn remote_type(&self) -> RemoteType {
        self.remote_type
    }

    /// Employment type.
    #[must_use]
    pub const fn employment_type(&self) -> EmploymentType {
        self.employment_type
    }

    /// Department, if stated.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Team, if stated.
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Publication time. May be absent, or in the future because of clock skew.
    #[must_use]
    pub const fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }

    /// Last update time reported by the source.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Plain-text description.
    #[must_use]
    pub fn description_text(&self) -> &str {
        &self.description_text
    }

    /// Requirement bullet points, in source order.
    #[must_use]
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    /// Seniority label, if the source provides one.
    #[must_use]
    pub fn seniority(&self) -> Option<&str> {
        self.seniority.as_deref()
    }

    /// Source-provided keyword tags.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Original source payload.
    #[must_use]
    pub const fn raw_payload(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.raw_payload
    }

    /// Exact dedup key: `company:source_system:source_job_id`.
    #[must_use]
    pub fn exact_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.company,
            self.source_system.as_str(),
            self.source_job_id
        )
    }

    /// Stable ID derived from the exact key.
    ///
    /// 16 hex characters (64 bits) of a SHA-256 digest. Used as the
    /// cross-run persistence key.
    #[must_use]
    pub fn id(&self) -> JobId {
        JobId(ContentHasher::job_id(&self.exact_key()))
    }

    /// Combined text used for fingerprinting and embedding.
    ///
    /// Title, description, each requirement, and department, space-joined.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3 + self.requirements.len());
        parts.push(&self.title);
        if !self.description_text.is_empty() {
            parts.push(&self.description_text);
        }
        parts.extend(self.requirements.iter().map(String::as_str));
        if let Some(department) = self.department.as_deref() {
            parts.push(department);
        }
        parts.join(" ")
    }
}
