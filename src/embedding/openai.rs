//! `OpenAI` (remote API) embedding backend.

use super::http::{EmbeddingHttpConfig, build_http_client, post_json};
use super::{EmbeddingProvider, ensure_count};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Embeds text through the `OpenAI` embeddings API.
///
/// The API key is held as a [`SecretString`] and never logged.
pub struct OpenAiEmbedder {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// Embedding model.
    model: String,
    /// Dimensions of the configured model.
    dimensions: usize,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OpenAiEmbedder {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.openai.com/v1";

    /// Default embedding model.
    pub const DEFAULT_MODEL: &'static str = "text-embedding-3-small";

    /// Dimensions of the default model.
    pub const DEFAULT_DIMENSIONS: usize = 1536;

    /// Creates a client, reading the key from `OPENAI_API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            dimensions: Self::DEFAULT_DIMENSIONS,
            client: build_http_client(EmbeddingHttpConfig::from_env()),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Clears the API key.
    #[must_use]
    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
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

    /// Returns the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for OpenAiEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let api_key = self.api_key.as_ref().ok_or_else(|| Error::OperationFailed {
            operation: "openai_embed".to_string(),
            cause: "OPENAI_API_KEY not set".to_string(),
        })?;

        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };
        let response: EmbeddingsResponse = post_json(
            self.client
                .post(format!("{}/embeddings", self.endpoint))
                .bearer_auth(api_key.expose_secret()),
            &request,
            "openai",
            "openai_embed",
        )?;

        ensure_count("openai_embed", texts.len(), response.into_ordered())
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingsResponse {
    /// Vectors in input order. The API does not promise response order.
    fn into_ordered(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|d| d.index);
        self.data.into_iter().map(|d| d.embedding).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_follows_key() {
        assert!(!OpenAiEmbedder::new().without_api_key().is_available());
        assert!(OpenAiEmbedder::new().with_api_key("sk-test").is_available());
    }

    #[test]
    fn test_embed_without_key_fails() {
        let err = OpenAiEmbedder::new()
            .without_api_key()
            .embed(&["text"])
            .expect_err("no key");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_empty_input_needs_no_key() {
        let vectors = OpenAiEmbedder::new()
            .without_api_key()
            .embed(&[])
            .expect("empty input");
        assert!(vectors.is_empty());
    }

    #[test]
    fn test_response_reordered_by_index() {
        let response: EmbeddingsResponse = serde_json::from_str(
            r#"{"object":"list","data":[
                {"object":"embedding","index":1,"embedding":[0.0,1.0]},
                {"object":"embedding","index":0,"embedding":[1.0,0.0]}
            ],"model":"text-embedding-3-small"}"#,
        )
        .expect("parse");
        assert_eq!(response.into_ordered(), vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_key_not_in_debug_output() {
        let embedder = OpenAiEmbedder::new().with_api_key("sk-very-secret");
        let key = embedder.api_key.as_ref().expect("key set");
        assert!(!format!("{key:?}").contains("sk-very-secret"));
    }

    #[test]
    fn test_configuration() {
        let embedder = OpenAiEmbedder::new()
            .with_model("text-embedding-3-large")
            .with_dimensions(3072)
            .with_endpoint("https://proxy.internal/v1/");
        assert_eq!(embedder.model(), "text-embedding-3-large");
        assert_eq!(embedder.dimensions(), 3072);
        assert_eq!(embedder.endpoint, "https://proxy.internal/v1");
    }
}
