//! Data models for jobsift.
//!
//! The two boundary types are [`JobPosting`], produced by source adapters,
//! and [`ScoredJobPosting`], handed to storage and notification.

mod enums;
mod job;
mod profile;
mod scored;

pub use enums::{EmploymentType, RemoteType, SourceSystem};
pub use job::{JobId, JobPosting};
pub use profile::{
    DEFAULT_KEYWORD_WEIGHT, DEFAULT_MIN_SCORE_THRESHOLD, DEFAULT_RECENCY_WEIGHT,
    DEFAULT_VECTOR_WEIGHT, MatchingProfile,
};
pub use scored::ScoredJobPosting;
