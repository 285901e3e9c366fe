//! Input files shared by the commands.

use crate::models::{JobId, JobPosting, MatchingProfile};
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

fn read(path: &Path, operation: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: format!("{}: {e}", path.display()),
    })
}

/// Loads postings from a JSON array.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be read and
/// [`Error::InvalidInput`] if it is not a JSON array of postings.
pub fn load_jobs(path: &Path) -> Result<Vec<JobPosting>> {
    let contents = read(path, "read_jobs_file")?;
    let jobs: Vec<JobPosting> = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidInput(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), jobs = jobs.len(), "Loaded postings");
    Ok(jobs)
}

/// Loads a matching profile from TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_profile(path: &Path) -> Result<MatchingProfile> {
    let contents = read(path, "read_profile_file")?;
    toml::from_str(&contents).map_err(|e| Error::InvalidProfile {
        reason: format!("{}: {e}", path.display()),
    })
}

/// Loads job IDs persisted by earlier runs, one per line.
///
/// Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be read.
pub fn load_seen_ids(path: &Path) -> Result<HashSet<JobId>> {
    let contents = read(path, "read_seen_ids")?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(JobId::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceSystem;
    use std::io::Write;

    fn temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_load_jobs() {
        let file = temp_file(
            r#"[
                {"company": "Acme", "title": "SRE", "source_job_id": "1", "source_system": "lever"},
                {"company": "Beta", "title": "Data Engineer", "source_job_id": "x9",
                 "posted_at": "2026-01-05T10:00:00Z", "remote_type": "remote"}
            ]"#,
        );

        let jobs = load_jobs(file.path()).expect("load");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source_system(), SourceSystem::Lever);
        assert_eq!(jobs[1].title(), "Data Engineer");
        assert!(jobs[1].posted_at().is_some());
    }

    #[test]
    fn test_load_jobs_rejects_object() {
        let file = temp_file(r#"{"company": "Acme"}"#);
        assert!(matches!(load_jobs(file.path()), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_profile() {
        let file = temp_file("desired_roles = [\"SRE\"]\nmin_score_threshold = 0.2\n");
        let profile = load_profile(file.path()).expect("load");
        assert_eq!(profile.desired_roles, vec!["SRE"]);
    }

    #[test]
    fn test_load_profile_rejects_misspelled_key() {
        let file = temp_file("must_not_keyword = [\"php\"]\n");
        assert!(matches!(
            load_profile(file.path()),
            Err(Error::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_load_seen_ids_skips_comments() {
        let file = temp_file("# previous run\nabc123\n\n  def456  \n");
        let ids = load_seen_ids(file.path()).expect("load");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&JobId::from("def456")));
    }
}
