//! Embedding backend selection.
//!
//! Selection happens once at startup: probe candidates in a fixed
//! preference order and keep the first that is available, falling back to
//! the [`NeutralEmbedder`] when none is.

use super::{
    EmbeddingHttpConfig, EmbeddingProvider, FastEmbedEmbedder, NeutralEmbedder, OllamaEmbedder,
    OpenAiEmbedder,
};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// First available of Ollama, `FastEmbed`, `OpenAI`.
    #[default]
    Auto,
    /// No semantic signal.
    None,
    /// Local Ollama server.
    Ollama,
    /// On-device model.
    #[serde(alias = "fast_embed", alias = "fast-embed")]
    FastEmbed,
    /// `OpenAI` embeddings API.
    #[serde(alias = "open_ai", alias = "open-ai")]
    OpenAi,
}

impl EmbeddingBackend {
    /// Returns the backend as a config string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Ollama => "ollama",
            Self::FastEmbed => "fastembed",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" | "neutral" | "off" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            "fastembed" | "fast_embed" | "fast-embed" => Ok(Self::FastEmbed),
            "openai" | "open_ai" | "open-ai" => Ok(Self::OpenAi),
            other => Err(Error::InvalidInput(format!(
                "unknown embedding backend '{other}' (expected auto, none, ollama, fastembed, openai)"
            ))),
        }
    }
}

/// Embedding backend settings.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingConfig {
    /// Backend to use.
    pub backend: EmbeddingBackend,
    /// Model override for the selected backend.
    pub model: Option<String>,
    /// Endpoint override for the selected backend.
    pub base_url: Option<String>,
    /// `OpenAI` API key override. `OPENAI_API_KEY` is used otherwise.
    pub api_key: Option<SecretString>,
    /// HTTP timeouts for server and API backends.
    pub http: EmbeddingHttpConfig,
}

impl EmbeddingConfig {
    /// Creates a configuration for a backend with default settings.
    #[must_use]
    pub fn for_backend(backend: EmbeddingBackend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }
}

/// Returns the first available candidate, else a [`NeutralEmbedder`].
///
/// Candidates are probed in order and probing stops at the first hit.
pub fn select_first_available(
    candidates: Vec<Arc<dyn EmbeddingProvider>>,
) -> Arc<dyn EmbeddingProvider> {
    for candidate in candidates {
        if candidate.is_available() {
            tracing::info!(provider = candidate.name(), "Selected embedding backend");
            return candidate;
        }
        tracing::debug!(provider = candidate.name(), "Embedding backend unavailable");
    }
    tracing::info!("No embedding backend available, semantic scores will be neutral");
    Arc::new(NeutralEmbedder::new())
}

fn ollama(config: &EmbeddingConfig) -> OllamaEmbedder {
    let mut embedder = OllamaEmbedder::new().with_http_config(config.http);
    if let Some(url) = &config.base_url {
        embedder = embedder.with_endpoint(url.clone());
    }
    if let Some(model) = &config.model {
        embedder = embedder.with_model(model.clone());
    }
    embedder
}

fn openai(config: &EmbeddingConfig) -> OpenAiEmbedder {
    let mut embedder = OpenAiEmbedder::new().with_http_config(config.http);
    if let Some(url) = &config.base_url {
        embedder = embedder.with_endpoint(url.clone());
    }
    if let Some(model) = &config.model {
        embedder = embedder.with_model(model.clone());
    }
    if let Some(key) = &config.api_key {
        embedder = embedder.with_api_key(key.expose_secret());
    }
    embedder
}

/// Builds the provider described by `config`.
///
/// `Auto` probes Ollama, then `FastEmbed`, then `OpenAI`. An explicitly
/// requested backend that is unavailable degrades to neutral with a
/// warning rather than failing startup.
#[must_use]
pub fn create_provider(config: &EmbeddingConfig) -> Arc<dyn EmbeddingProvider> {
    let candidate: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::None => return Arc::new(NeutralEmbedder::new()),
        EmbeddingBackend::Auto => {
            // Model and endpoint overrides are backend specific, so Auto
            // probes every backend with its own defaults.
            return select_first_available(vec![
                Arc::new(ollama(&EmbeddingConfig {
                    model: None,
                    base_url: None,
                    ..config.clone()
                })),
                Arc::new(FastEmbedEmbedder::new()),
                Arc::new(openai(&EmbeddingConfig {
                    model: None,
                    base_url: None,
                    ..config.clone()
                })),
            ]);
        },
        EmbeddingBackend::Ollama => Arc::new(ollama(config)),
        EmbeddingBackend::FastEmbed => Arc::new(FastEmbedEmbedder::new()),
        EmbeddingBackend::OpenAi => Arc::new(openai(config)),
    };

    if candidate.is_available() {
        tracing::info!(provider = candidate.name(), "Selected embedding backend");
        candidate
    } else {
        tracing::warn!(
            backend = %config.backend,
            "Requested embedding backend is unavailable, falling back to neutral scores"
        );
        Arc::new(NeutralEmbedder::new())
    }
}
