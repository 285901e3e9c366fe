//! Observability and telemetry.
//!
//! Logging goes through `tracing` with a `tracing-subscriber` fmt layer,
//! pretty or JSON, to stderr or a file. Counters go through the `metrics`
//! facade:
//!
//! | Counter | Labels |
//! |---------|--------|
//! | `dedup_checks_total` | `result`, `reason` |
//! | `scoring_jobs_total` | `outcome` |
//! | `embedding_failures_total` | `provider` |
//!
//! Installing a metrics recorder is left to the host application.

mod logging;

pub use logging::{LogFormat, LoggingConfig};

use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static OBSERVABILITY_INIT: OnceLock<()> = OnceLock::new();

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if observability has already been initialized, the
/// filter directive is invalid, or the log file cannot be opened.
pub fn init(config: LoggingConfig) -> Result<()> {
    if OBSERVABILITY_INIT.get().is_some() {
        return Err(already_initialized());
    }

    let filter = EnvFilter::try_new(&config.filter).map_err(|e| Error::OperationFailed {
        operation: "observability_init".to_string(),
        cause: format!("invalid log filter '{}': {e}", config.filter),
    })?;

    match (&config.file, config.format) {
        (Some(log_file), LogFormat::Json) => {
            let writer = open_log_file(log_file)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(init_error)?;
        },
        (Some(log_file), LogFormat::Pretty) => {
            let writer = open_log_file(log_file)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(init_error)?;
        },
        (None, LogFormat::Json) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(init_error)?;
        },
        (None, LogFormat::Pretty) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(io::stderr)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(init_error)?;
        },
    }

    OBSERVABILITY_INIT.set(()).map_err(|()| already_initialized())
}

fn already_initialized() -> Error {
    Error::OperationFailed {
        operation: "observability_init".to_string(),
        cause: "observability already initialized".to_string(),
    }
}

/// Thread-safe file writer for logging.
#[derive(Clone)]
struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?;
        guard.flush()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogFileWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Opens a log file for appending, creating parent directories.
fn open_log_file(path: &Path) -> Result<LogFileWriter> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
            operation: "create_log_dir".to_string(),
            cause: e.to_string(),
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::OperationFailed {
            operation: "open_log_file".to_string(),
            cause: format!("{}: {}", path.display(), e),
        })?;

    Ok(LogFileWriter {
        file: Arc::new(Mutex::new(file)),
    })
}

#[allow(clippy::needless_pass_by_value)]
fn init_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::OperationFailed {
        operation: "observability_init".to_string(),
        cause: e.to_string(),
    }
}
