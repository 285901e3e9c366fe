//! Configuration management.
//!
//! Settings come from a TOML file, then `JOBSIFT_*` environment variables.
//! Every section and field is optional; anything missing keeps its default.
//!
//! ```toml
//! [profile]
//! desired_roles = ["Backend Engineer"]
//! must_not_keywords = ["clearance"]
//!
//! [embedding]
//! backend = "ollama"
//! model = "nomic-embed-text"
//! timeout_ms = 10000
//!
//! [dedup]
//! similarity_threshold = 0.9
//!
//! [scoring]
//! recency_max_age_days = 14
//! batch_size = 16
//!
//! [logging]
//! format = "json"
//! level = "jobsift=debug"
//! ```

use crate::embedding::{EmbeddingBackend, EmbeddingConfig};
use crate::models::MatchingProfile;
use crate::observability::{LogFormat, LoggingConfig};
use crate::services::DeduplicationConfig;
use crate::services::scoring::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_AGE_DAYS, RecencyScorer};
use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file name looked up by [`JobsiftConfig::load_default`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration for jobsift.
#[derive(Debug, Clone)]
pub struct JobsiftConfig {
    /// Matching profile used for scoring.
    pub profile: MatchingProfile,
    /// Embedding backend selection.
    pub embedding: EmbeddingConfig,
    /// Deduplication settings.
    pub dedup: DeduplicationConfig,
    /// Age in days at which recency reaches 0.
    pub recency_max_age_days: f64,
    /// Job texts per embedding call.
    pub batch_size: usize,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for JobsiftConfig {
    fn default() -> Self {
        Self {
            profile: MatchingProfile::default(),
            embedding: EmbeddingConfig::default(),
            dedup: DeduplicationConfig::default(),
            recency_max_age_days: DEFAULT_MAX_AGE_DAYS,
            batch_size: DEFAULT_BATCH_SIZE,
            logging: LoggingSettings::default(),
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Matching profile.
    pub profile: Option<MatchingProfile>,
    /// Embedding section.
    pub embedding: Option<ConfigFileEmbedding>,
    /// Deduplication section.
    pub dedup: Option<DeduplicationConfig>,
    /// Scoring section.
    pub scoring: Option<ConfigFileScoring>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Embedding section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileEmbedding {
    /// Backend name: `auto`, `none`, `ollama`, `fastembed`, `openai`.
    pub backend: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// API key, or an environment reference like `${OPENAI_API_KEY}`.
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Scoring section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileScoring {
    /// Recency window in days.
    pub recency_max_age_days: Option<f64>,
    /// Embedding batch size.
    pub batch_size: Option<usize>,
}

/// Logging section in config file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `info` or `jobsift=debug`.
    pub level: Option<String>,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<String>,
}

impl JobsiftConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// unknown embedding backend.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        let config = Self::from_toml_str(&contents)?.with_env_overrides();
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses TOML config text without applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML, names an
    /// unknown embedding backend, or holds out-of-range values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        let config = Self::from_config_file(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the scoring and deduplication settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the recency window is not a
    /// positive number, the batch size is 0, or the deduplication settings
    /// are out of range.
    pub fn validate(&self) -> Result<()> {
        RecencyScorer::new(self.recency_max_age_days)?;
        if self.batch_size == 0 {
            return Err(Error::InvalidInput("batch_size must be at least 1".to_string()));
        }
        self.dedup.validate()
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/.config/jobsift/` on Linux)
    /// 2. XDG-style `~/.config/jobsift/` for Unix compatibility on macOS
    ///
    /// Falls back to defaults plus environment overrides when no file is
    /// found or the file is unusable.
    #[must_use]
    pub fn load_default() -> Self {
        for path in default_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                },
            }
        }
        Self::default().with_env_overrides()
    }

    /// Loads `path` if given, otherwise the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` cannot be loaded, or if the
    /// settings are invalid once environment overrides are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = path.map_or_else(|| Ok(Self::load_default()), Self::load_from_file)?;
        config.validate()?;
        Ok(config)
    }

    /// Converts a `ConfigFile` to `JobsiftConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(profile) = file.profile {
            config.profile = profile;
        }
        if let Some(dedup) = file.dedup {
            config.dedup = dedup;
        }
        if let Some(embedding) = file.embedding {
            if let Some(backend) = embedding.backend {
                config.embedding.backend = backend.parse()?;
            }
            config.embedding.model = embedding.model;
            config.embedding.base_url = embedding.base_url;
            config.embedding.api_key = embedding
                .api_key
                .and_then(|key| resolve_env_reference(&key))
                .map(SecretString::from);
            if let Some(timeout_ms) = embedding.timeout_ms {
                config.embedding.http.timeout_ms = timeout_ms;
            }
            if let Some(connect_timeout_ms) = embedding.connect_timeout_ms {
                config.embedding.http.connect_timeout_ms = connect_timeout_ms;
            }
        }
        if let Some(scoring) = file.scoring {
            if let Some(days) = scoring.recency_max_age_days {
                config.recency_max_age_days = days;
            }
            if let Some(batch_size) = scoring.batch_size {
                config.batch_size = batch_size;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Applies `JOBSIFT_*` environment variable overrides.
    ///
    /// | Variable | Overrides |
    /// |----------|-----------|
    /// | `JOBSIFT_EMBEDDING_BACKEND` | `embedding.backend` |
    /// | `JOBSIFT_EMBEDDING_MODEL` | `embedding.model` |
    /// | `JOBSIFT_EMBEDDING_BASE_URL` | `embedding.base_url` |
    /// | `JOBSIFT_EMBEDDING_TIMEOUT_MS` | `embedding.timeout_ms` |
    /// | `JOBSIFT_EMBEDDING_CONNECT_TIMEOUT_MS` | `embedding.connect_timeout_ms` |
    /// | `JOBSIFT_DEDUP_*` | see [`DeduplicationConfig`] |
    /// | `JOBSIFT_RECENCY_MAX_AGE_DAYS` | `scoring.recency_max_age_days` |
    /// | `JOBSIFT_BATCH_SIZE` | `scoring.batch_size` |
    ///
    /// Logging variables are read by [`LoggingConfig::from_settings`].
    /// Unparsable values are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("JOBSIFT_EMBEDDING_BACKEND") {
            match v.parse::<EmbeddingBackend>() {
                Ok(backend) => self.embedding.backend = backend,
                Err(e) => tracing::warn!(error = %e, "Ignoring JOBSIFT_EMBEDDING_BACKEND"),
            }
        }
        if let Ok(v) = std::env::var("JOBSIFT_EMBEDDING_MODEL") {
            self.embedding.model = Some(v);
        }
        if let Ok(v) = std::env::var("JOBSIFT_EMBEDDING_BASE_URL") {
            self.embedding.base_url = Some(v);
        }
        self.embedding.http = self.embedding.http.with_env_overrides();
        self.dedup = self.dedup.with_env_overrides();

        if let Ok(v) = std::env::var("JOBSIFT_RECENCY_MAX_AGE_DAYS") {
            match v.parse() {
                Ok(days) => self.recency_max_age_days = days,
                Err(_) => tracing::warn!(value = %v, "Ignoring JOBSIFT_RECENCY_MAX_AGE_DAYS"),
            }
        }
        if let Ok(v) = std::env::var("JOBSIFT_BATCH_SIZE") {
            match v.parse() {
                Ok(batch_size) => self.batch_size = batch_size,
                Err(_) => tracing::warn!(value = %v, "Ignoring JOBSIFT_BATCH_SIZE"),
            }
        }
        self
    }

    /// Sets the matching profile.
    #[must_use]
    pub fn with_profile(mut self, profile: MatchingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the embedding backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: EmbeddingBackend) -> Self {
        self.embedding.backend = backend;
        self
    }

    /// Builds the logging configuration for `observability::init`.
    #[must_use]
    pub fn logging_config(&self, verbose: bool) -> LoggingConfig {
        LoggingConfig::from_settings(Some(&self.logging), verbose)
    }
}

impl LoggingSettings {
    /// Parsed output format, pretty unless set to `json`.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.format
            .as_deref()
            .map_or(LogFormat::Pretty, LogFormat::parse)
    }

    /// Log file path, if set.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().filter(|f| !f.is_empty()).map(PathBuf::from)
    }
}

/// Resolves `${VAR}` to the variable's value. Plain values pass through.
///
/// Returns `None` for a reference to an unset or empty variable.
fn resolve_env_reference(value: &str) -> Option<String> {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(var) => std::env::var(var).ok().filter(|v| !v.is_empty()),
        None if trimmed.is_empty() => None,
        None => Some(trimmed.to_string()),
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    let Some(base_dirs) = directories::BaseDirs::new() else {
        return Vec::new();
    };
    let platform = base_dirs.config_dir().join("jobsift").join(CONFIG_FILE_NAME);
    let xdg = base_dirs
        .home_dir()
        .join(".config")
        .join("jobsift")
        .join(CONFIG_FILE_NAME);
    if platform == xdg {
        vec![platform]
    } else {
        vec![platform, xdg]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = JobsiftConfig::from_toml_str("").expect("parse");
        assert_eq!(config.profile, MatchingProfile::default());
        assert_eq!(config.embedding.backend, EmbeddingBackend::Auto);
        assert_eq!(config.dedup, DeduplicationConfig::default());
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!((config.recency_max_age_days - DEFAULT_MAX_AGE_DAYS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_file() {
        let config = JobsiftConfig::from_toml_str(
            r#"
            [profile]
            name = "interns"
            desired_roles = ["Backend Intern"]
            min_score_threshold = 0.2

            [embedding]
            backend = "openai"
            model = "text-embedding-3-large"
            api_key = "sk-test"
            timeout_ms = 5000

            [dedup]
            similarity_threshold = 0.9

            [scoring]
            recency_max_age_days = 14.0
            batch_size = 8

            [logging]
            format = "json"
            level = "debug"
            "#,
        )
        .expect("parse");

        assert_eq!(config.profile.name, "interns");
        assert_eq!(config.profile.desired_roles, vec!["Backend Intern"]);
        assert_eq!(config.embedding.backend, EmbeddingBackend::OpenAi);
        assert_eq!(config.embedding.model.as_deref(), Some("text-embedding-3-large"));
        assert_eq!(
            config.embedding.api_key.as_ref().map(|k| k.expose_secret()),
            Some("sk-test")
        );
        assert_eq!(config.embedding.http.timeout_ms, 5000);
        assert_eq!(config.embedding.http.connect_timeout_ms, 3000);
        assert!(config.dedup.enabled);
        assert!((config.dedup.similarity_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.batch_size, 8);
        assert!((config.recency_max_age_days - 14.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.log_format(), LogFormat::Json);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = JobsiftConfig::from_toml_str("[embedding]\nbackend = \"word2vec\"")
            .expect_err("unknown backend");
        assert!(err.to_string().contains("word2vec"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(JobsiftConfig::from_toml_str("[storage]\npath = \"x\"").is_err());
    }

    #[test]
    fn test_misspelled_nested_keys_rejected() {
        assert!(JobsiftConfig::from_toml_str("[profile]\nmust_not_keyword = [\"php\"]").is_err());
        assert!(JobsiftConfig::from_toml_str("[dedup]\nsimhash_treshold = 0.1").is_err());
    }

    #[test]
    fn test_out_of_range_scoring_rejected() {
        for toml in [
            "[scoring]\nrecency_max_age_days = 0.0",
            "[scoring]\nrecency_max_age_days = -7.0",
            "[scoring]\nbatch_size = 0",
            "[dedup]\nfingerprint_bits = 65",
        ] {
            let err = JobsiftConfig::from_toml_str(toml).expect_err(toml);
            assert!(matches!(err, Error::InvalidInput(_)), "{toml}: {err}");
        }
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[scoring]\nrecency_max_age_days = -1.0").expect("write");
        assert!(JobsiftConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[profile]\nmust_not_keywords = [\"senior\"]").expect("write");

        let config = JobsiftConfig::load_from_file(file.path()).expect("load");
        assert_eq!(config.profile.must_not_keywords, vec!["senior"]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = JobsiftConfig::load(Some(dir.path().join("missing.toml").as_path()));
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_resolve_env_reference() {
        assert_eq!(resolve_env_reference(" sk-plain ").as_deref(), Some("sk-plain"));
        assert_eq!(resolve_env_reference(""), None);
        assert_eq!(resolve_env_reference("${JOBSIFT_TEST_UNSET_VARIABLE_42}"), None);
        // PATH is set in every test environment.
        assert!(resolve_env_reference("${PATH}").is_some());
    }

    #[test]
    fn test_logging_settings_defaults() {
        let settings = LoggingSettings::default();
        assert_eq!(settings.log_format(), LogFormat::Pretty);
        assert!(settings.file_path().is_none());
    }
}
