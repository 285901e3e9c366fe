//! `rank` command.

use super::input::{load_jobs, load_profile, load_seen_ids};
use crate::config::JobsiftConfig;
use crate::embedding::{EmbeddingBackend, create_provider};
use crate::models::ScoredJobPosting;
use crate::services::scoring::{Freshness, filter_jobs_by_time};
use crate::services::{Deduplicator, RecencyScorer, Scorer};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Output format for the rank command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Arguments of the rank command.
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    /// JSON array of postings.
    pub jobs: PathBuf,
    /// Profile TOML. The config file's `[profile]` is used otherwise.
    pub profile: Option<PathBuf>,
    /// Minimum final score. The profile threshold is used otherwise.
    pub min_score: Option<f64>,
    /// Time window like `7d`.
    pub since: Option<String>,
    /// Job IDs seen by earlier runs.
    pub seen: Option<PathBuf>,
    /// Embedding backend override.
    pub backend: Option<EmbeddingBackend>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Output format.
    pub format: OutputFormat,
}

/// Runs the ranking pipeline and returns the ranked postings.
///
/// Postings are time-filtered, deduplicated, then scored as of `now`.
///
/// # Errors
///
/// Returns an error if an input file cannot be loaded, the time filter is
/// invalid, or the profile or dedup settings are malformed.
pub fn run_rank(
    config: &JobsiftConfig,
    options: &RankOptions,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<ScoredJobPosting>> {
    let mut jobs = load_jobs(&options.jobs)
        .with_context(|| format!("loading postings from {}", options.jobs.display()))?;
    if let Some(since) = options.since.as_deref() {
        jobs = filter_jobs_by_time(jobs, since, now)?;
    }

    let profile = match options.profile.as_deref() {
        Some(path) => load_profile(path)?,
        None => config.profile.clone(),
    };

    let mut dedup = Deduplicator::new(config.dedup.clone())?;
    if let Some(seen) = options.seen.as_deref() {
        let ids = load_seen_ids(seen)?;
        tracing::info!(seen = ids.len(), "Loaded previously seen postings");
        dedup = dedup.with_existence_check(Arc::new(ids));
    }
    let total = jobs.len();
    let unique = dedup.dedupe(jobs);

    let mut embedding = config.embedding.clone();
    if let Some(backend) = options.backend {
        embedding.backend = backend;
    }
    let provider = create_provider(&embedding);

    let scorer = Scorer::new(profile, provider)?
        .with_recency(RecencyScorer::new(config.recency_max_age_days)?)
        .with_batch_size(config.batch_size);
    if let Err(e) = scorer.precompute_profile_embedding() {
        tracing::warn!(error = %e, "Profile embedding unavailable, semantic scores are neutral");
    }

    let mut ranked = scorer.score_batch_at(&unique, options.min_score, now);
    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }

    tracing::info!(
        total,
        unique = unique.len(),
        ranked = ranked.len(),
        provider = scorer.provider().name(),
        "Ranked postings"
    );
    Ok(ranked)
}

/// Executes the rank command, printing to stdout.
///
/// # Errors
///
/// Returns an error if ranking or output fails.
pub fn cmd_rank(config: &JobsiftConfig, options: &RankOptions) -> anyhow::Result<()> {
    let now = Utc::now();
    let ranked = run_rank(config, options, now)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match options.format {
        OutputFormat::Table => write_table(&mut handle, &ranked, now)?,
        OutputFormat::Json => write_json(&mut handle, &ranked)?,
    }
    Ok(())
}

/// Writes ranked postings as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(
    writer: &mut W,
    ranked: &[ScoredJobPosting],
    now: DateTime<Utc>,
) -> io::Result<()> {
    if ranked.is_empty() {
        return writeln!(writer, "No matching postings.");
    }
    writeln!(
        writer,
        "{:<7}{:<18}{:<20}{:<40}REASONS",
        "SCORE", "POSTED", "COMPANY", "TITLE"
    )?;
    for scored in ranked {
        writeln!(
            writer,
            "{:<7.3}{:<18}{:<20}{:<40}{}",
            scored.final_score,
            Freshness::of(&scored.job, now).label(),
            scored.job.company(),
            scored.job.title(),
            scored.match_reasons.join("; ")
        )?;
    }
    Ok(())
}

/// Writes ranked postings as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, ranked: &[ScoredJobPosting]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(ranked)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobPosting, MatchingProfile, SourceSystem};
    use chrono::TimeDelta;
    use std::io::Write as _;

    fn jobs_file(jobs: &[JobPosting]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(serde_json::to_string(jobs).expect("json").as_bytes())
            .expect("write");
        file
    }

    fn config() -> JobsiftConfig {
        JobsiftConfig::default()
            .with_backend(EmbeddingBackend::None)
            .with_profile(MatchingProfile {
                desired_roles: vec!["Backend Engineer".to_string()],
                must_not_keywords: vec!["clearance".to_string()],
                min_score_threshold: 0.1,
                ..MatchingProfile::default()
            })
    }

    #[test]
    fn test_output_format_values() {
        use clap::ValueEnum;
        assert_eq!(OutputFormat::from_str("JSON", true), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("table", true), Ok(OutputFormat::Table));
        assert!(OutputFormat::from_str("csv", true).is_err());
    }

    #[test]
    fn test_run_rank_pipeline() {
        let now = Utc::now();
        let file = jobs_file(&[
            JobPosting::new("Acme", SourceSystem::Lever, "1", "Backend Engineer")
                .with_posted_at(now - TimeDelta::hours(3)),
            JobPosting::new("Acme", SourceSystem::Lever, "1", "Backend Engineer")
                .with_posted_at(now - TimeDelta::hours(3)),
            JobPosting::new("Beta", SourceSystem::Ashby, "2", "Backend Engineer")
                .with_description("Active clearance required"),
            JobPosting::new("Gamma", SourceSystem::Greenhouse, "3", "Backend Engineer")
                .with_posted_at(now - TimeDelta::days(60)),
        ]);

        let options = RankOptions {
            jobs: file.path().to_path_buf(),
            since: Some("30d".to_string()),
            ..RankOptions::default()
        };
        let ranked = run_rank(&config(), &options, now).expect("rank");

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].job.company(), "Acme");
    }

    #[test]
    fn test_run_rank_skips_seen() {
        let job = JobPosting::new("Acme", SourceSystem::Lever, "1", "Backend Engineer");
        let jobs = jobs_file(std::slice::from_ref(&job));
        let mut seen = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(seen, "{}", job.id()).expect("write");

        let options = RankOptions {
            jobs: jobs.path().to_path_buf(),
            seen: Some(seen.path().to_path_buf()),
            ..RankOptions::default()
        };
        assert!(run_rank(&config(), &options, Utc::now()).expect("rank").is_empty());
    }

    #[test]
    fn test_run_rank_rejects_bad_window() {
        let file = jobs_file(&[]);
        let options = RankOptions {
            jobs: file.path().to_path_buf(),
            since: Some("yesterday".to_string()),
            ..RankOptions::default()
        };
        assert!(run_rank(&config(), &options, Utc::now()).is_err());
    }

    #[test]
    fn test_run_rank_rejects_invalid_recency_window() {
        let file = jobs_file(&[]);
        let options = RankOptions {
            jobs: file.path().to_path_buf(),
            ..RankOptions::default()
        };
        let config = JobsiftConfig {
            recency_max_age_days: -1.0,
            ..config()
        };
        let err = run_rank(&config, &options, Utc::now()).expect_err("invalid window");
        assert!(err.to_string().contains("recency_max_age_days"));
    }

    #[test]
    fn test_write_table() {
        let now = Utc::now();
        let job = JobPosting::new("Acme", SourceSystem::Lever, "1", "Backend Engineer")
            .with_posted_at(now);
        let scored = ScoredJobPosting {
            final_score: 0.75,
            vector_score: 0.5,
            keyword_score: 1.0,
            recency_score: 1.0,
            match_reasons: vec!["Role match: Backend Engineer".to_string()],
            excluded: false,
            job,
        };

        let mut buffer = Vec::new();
        write_table(&mut buffer, &[scored], now).expect("write");
        let output = String::from_utf8(buffer).expect("utf8");
        assert!(output.starts_with("SCORE"));
        assert!(output.contains("0.750"));
        assert!(output.contains("New (today)"));
        assert!(output.contains("Role match: Backend Engineer"));
    }

    #[test]
    fn test_write_table_empty() {
        let mut buffer = Vec::new();
        write_table(&mut buffer, &[], Utc::now()).expect("write");
        assert_eq!(String::from_utf8(buffer).expect("utf8"), "No matching postings.\n");
    }

    #[test]
    fn test_write_json() {
        let job = JobPosting::new("Acme", SourceSystem::Lever, "1", "SRE");
        let scored = ScoredJobPosting::excluded(job, vec!["Excluded: contains 'x'".to_string()]);
        let mut buffer = Vec::new();
        write_json(&mut buffer, &[scored]).expect("write");
        let output = String::from_utf8(buffer).expect("utf8");
        assert!(output.contains("\"final_score\": 0.0"));
        assert!(output.contains("\"excluded\": true"));
    }
}
