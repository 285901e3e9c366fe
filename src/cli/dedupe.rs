//! `dedupe` command.

use super::input::{load_jobs, load_seen_ids};
use crate::config::JobsiftConfig;
use crate::models::JobPosting;
use crate::services::Deduplicator;
use anyhow::Context;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of the dedupe command.
#[derive(Debug, Clone, Default)]
pub struct DedupeOptions {
    /// JSON array of postings.
    pub jobs: PathBuf,
    /// Job IDs seen by earlier runs.
    pub seen: Option<PathBuf>,
}

/// Outcome of a dedupe run.
#[derive(Debug, Clone, Serialize)]
pub struct DedupeReport {
    /// Postings that survived, in input order.
    pub unique: Vec<JobPosting>,
    /// Number of postings dropped.
    pub duplicates: usize,
}

/// Loads postings and drops duplicates.
///
/// # Errors
///
/// Returns an error if an input file cannot be loaded or the dedup settings
/// are invalid.
pub fn run_dedupe(config: &JobsiftConfig, options: &DedupeOptions) -> anyhow::Result<DedupeReport> {
    let jobs = load_jobs(&options.jobs)
        .with_context(|| format!("loading postings from {}", options.jobs.display()))?;

    let mut dedup = Deduplicator::new(config.dedup.clone())?;
    if let Some(seen) = options.seen.as_deref() {
        dedup = dedup.with_existence_check(Arc::new(load_seen_ids(seen)?));
    }

    let total = jobs.len();
    let unique = dedup.dedupe(jobs);
    let duplicates = total - unique.len();
    tracing::info!(total, unique = unique.len(), duplicates, "Deduplicated postings");

    Ok(DedupeReport { unique, duplicates })
}

/// Executes the dedupe command, printing the unique postings as JSON.
///
/// # Errors
///
/// Returns an error if deduplication or output fails.
pub fn cmd_dedupe(config: &JobsiftConfig, options: &DedupeOptions) -> anyhow::Result<()> {
    let report = run_dedupe(config, options)?;
    let json = serde_json::to_string_pretty(&report.unique)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}")?;
    Ok(())
}
