//! Classification enums shared by job postings and matching profiles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Applicant tracking system (or other source) a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSystem {
    /// Greenhouse job boards.
    Greenhouse,
    /// Lever postings.
    Lever,
    /// Workday career sites.
    Workday,
    /// iCIMS career portals.
    Icims,
    /// `SmartRecruiters` postings.
    SmartRecruiters,
    /// SAP `SuccessFactors`.
    SuccessFactors,
    /// Oracle Taleo.
    Taleo,
    /// Ashby job boards.
    Ashby,
    /// Anything else, including unrecognized source names.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SourceSystem {
    /// Returns all known source systems, `Unknown` last.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Greenhouse,
            Self::Lever,
            Self::Workday,
            Self::Icims,
            Self::SmartRecruiters,
            Self::SuccessFactors,
            Self::Taleo,
            Self::Ashby,
            Self::Unknown,
        ]
    }

    /// Returns the source system as a string slice.
    ///
    /// This is the value embedded in exact dedup keys, so it must stay stable.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Greenhouse => "greenhouse",
            Self::Lever => "lever",
            Self::Workday => "workday",
            Self::Icims => "icims",
            Self::SmartRecruiters => "smartrecruiters",
            Self::SuccessFactors => "successfactors",
            Self::Taleo => "taleo",
            Self::Ashby => "ashby",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a source system from a string.
    ///
    /// Unrecognized names map to `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "greenhouse" => Self::Greenhouse,
            "lever" => Self::Lever,
            "workday" => Self::Workday,
            "icims" => Self::Icims,
            "smartrecruiters" | "smart_recruiters" | "smart-recruiters" => Self::SmartRecruiters,
            "successfactors" | "success_factors" => Self::SuccessFactors,
            "taleo" => Self::Taleo,
            "ashby" => Self::Ashby,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote work arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    /// Fully on site.
    Onsite,
    /// Mix of on site and remote.
    Hybrid,
    /// Fully remote.
    Remote,
    /// Not stated by the source.
    #[default]
    #[serde(other)]
    Unknown,
}

impl RemoteType {
    /// Returns the remote type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Onsite => "onsite",
            Self::Hybrid => "hybrid",
            Self::Remote => "remote",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a remote type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "onsite" | "on-site" | "on_site" | "office" => Some(Self::Onsite),
            "hybrid" => Some(Self::Hybrid),
            "remote" => Some(Self::Remote),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Permanent full-time position.
    FullTime,
    /// Part-time position.
    PartTime,
    /// Fixed-term contract.
    Contract,
    /// Internship.
    Internship,
    /// Temporary position.
    Temporary,
    /// Not stated by the source.
    #[default]
    #[serde(other)]
    Unknown,
}

impl EmploymentType {
    /// Returns the employment type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Temporary => "temporary",
            Self::Unknown => "unknown",
        }
    }

    /// Parses an employment type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "full_time" | "full-time" | "fulltime" => Some(Self::FullTime),
            "part_time" | "part-time" | "parttime" => Some(Self::PartTime),
            "contract" | "contractor" => Some(Self::Contract),
            "internship" | "intern" => Some(Self::Internship),
            "temporary" | "temp" => Some(Self::Temporary),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
