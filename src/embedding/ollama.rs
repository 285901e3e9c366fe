//! Ollama (local server) embedding backend.

use super::http::{EmbeddingHttpConfig, build_http_client, post_json};
use super::{EmbeddingProvider, ensure_count};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Embeds text through a local Ollama server.
pub struct OllamaEmbedder {
    /// API endpoint.
    endpoint: String,
    /// Embedding model.
    model: String,
    /// Dimensions reported before the first call.
    dimensions: usize,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OllamaEmbedder {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:11434";

    /// Default embedding model.
    pub const DEFAULT_MODEL: &'static str = "nomic-embed-text";

    /// Dimensions of the default model.
    pub const DEFAULT_DIMENSIONS: usize = 768;

    /// Creates a client from `OLLAMA_HOST` and `OLLAMA_EMBED_MODEL`.
    #[must_use]
    pub fn new() -> Self {
        let endpoint =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string());
        let model = std::env::var("OLLAMA_EMBED_MODEL")
            .unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            dimensions: Self::DEFAULT_DIMENSIONS,
            client: build_http_client(EmbeddingHttpConfig::from_env()),
        }
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the reported dimensions for a non-default model.
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: EmbeddingHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn has_model(&self, tags: &TagsResponse) -> bool {
        tags.models.iter().any(|m| m.name.starts_with(&self.model))
    }
}

impl Default for OllamaEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let response: EmbedResponse = post_json(
            self.client.post(format!("{}/api/embed", self.endpoint)),
            &request,
            "ollama",
            "ollama_embed",
        )?;

        ensure_count("ollama_embed", texts.len(), response.embeddings)
    }

    fn is_available(&self) -> bool {
        let tags = self
            .client
            .get(format!("{}/api/tags", self.endpoint))
            .send()
            .ok()
            .filter(|r| r.status().is_success())
            .and_then(|r| r.json::<TagsResponse>().ok());

        match tags {
            Some(tags) if self.has_model(&tags) => true,
            Some(_) => {
                tracing::debug!(model = %self.model, "Ollama is running but the model is not pulled");
                false
            },
            None => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}
