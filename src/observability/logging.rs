//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Default filter directive.
const DEFAULT_LEVEL: &str = "info";
/// Filter directive when verbose output is requested.
const VERBOSE_LEVEL: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name. Anything but `json` is pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
    /// Log file. Stderr when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: DEFAULT_LEVEL.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// The filter is the first of `JOBSIFT_LOG`, `RUST_LOG`, the configured
    /// level, then `debug` when verbose or `info` otherwise.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let configured_level = settings.and_then(|s| s.level.clone());
        let fallback = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };
        let filter = env_filter_directive()
            .or(configured_level)
            .unwrap_or_else(|| fallback.to_string());

        let mut format = settings.map_or(LogFormat::Pretty, LoggingSettings::log_format);
        if let Ok(v) = std::env::var("JOBSIFT_LOG_FORMAT") {
            format = LogFormat::parse(&v);
        }
        let file = std::env::var("JOBSIFT_LOG_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| settings.and_then(LoggingSettings::file_path));

        Self {
            format,
            filter,
            file,
        }
    }
}

fn env_filter_directive() -> Option<String> {
    ["JOBSIFT_LOG", "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
}
