//! Shared blocking HTTP setup for remote embedding backends.

use crate::Error;
use std::time::Duration;

/// HTTP client configuration for embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for EmbeddingHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl EmbeddingHttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("JOBSIFT_EMBEDDING_TIMEOUT_MS")
            && let Ok(timeout_ms) = v.parse::<u64>()
        {
            self.timeout_ms = timeout_ms;
        }
        if let Ok(v) = std::env::var("JOBSIFT_EMBEDDING_CONNECT_TIMEOUT_MS")
            && let Ok(connect_timeout_ms) = v.parse::<u64>()
        {
            self.connect_timeout_ms = connect_timeout_ms;
        }
        self
    }
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: EmbeddingHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build embedding HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Classifies a transport error for logs.
pub(super) fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else if e.is_decode() {
        "decode"
    } else {
        "unknown"
    }
}

/// Sends a JSON POST and decodes a JSON response.
///
/// Transport errors, non-success statuses and undecodable bodies all map to
/// [`Error::OperationFailed`] tagged with `operation`.
pub(super) fn post_json<Req, Resp>(
    request: reqwest::blocking::RequestBuilder,
    body: &Req,
    provider: &'static str,
    operation: &str,
) -> crate::Result<Resp>
where
    Req: serde::Serialize + ?Sized,
    Resp: serde::de::DeserializeOwned,
{
    let response = request.json(body).send().map_err(|e| {
        let kind = error_kind(&e);
        tracing::warn!(
            provider = provider,
            error = %e,
            error_kind = kind,
            "Embedding request failed"
        );
        Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("{kind} error: {e}"),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        tracing::warn!(
            provider = provider,
            status = %status,
            body = %body,
            "Embedding API returned error status"
        );
        return Err(Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("API returned status: {status} - {body}"),
        });
    }

    response.json().map_err(|e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: format!("invalid response body: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = EmbeddingHttpConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.connect_timeout_ms, 3_000);
    }

    #[test]
    fn test_build_client_with_disabled_timeouts() {
        let config = EmbeddingHttpConfig {
            timeout_ms: 0,
            connect_timeout_ms: 0,
        };
        let _client = build_http_client(config);
    }
}
