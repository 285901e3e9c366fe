//! On-device embedding backend.
//!
//! Uses the all-MiniLM-L6-v2 model via fastembed-rs when the
//! `fastembed-embeddings` feature is enabled. Without the feature the
//! backend reports itself unavailable and every embed call fails with
//! [`crate::Error::FeatureNotEnabled`].

use super::{DEFAULT_DIMENSIONS, EmbeddingProvider};
use crate::Result;

/// Model name used in logs.
const MODEL_NAME: &str = "all-MiniLM-L6-v2";

// ============================================================================
// Native FastEmbed Implementation (with feature)
// ============================================================================

#[cfg(feature = "fastembed-embeddings")]
mod native {
    use super::MODEL_NAME;
    use crate::{Error, Result};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::{Mutex, OnceLock, PoisonError};
    use std::time::Instant;

    /// Process-wide model, loaded on first use.
    static EMBEDDING_MODEL: OnceLock<Mutex<fastembed::TextEmbedding>> = OnceLock::new();

    /// Serializes model loading so concurrent first calls load it once.
    static LOAD_LOCK: Mutex<()> = Mutex::new(());

    fn get_model() -> Result<&'static Mutex<fastembed::TextEmbedding>> {
        if let Some(model) = EMBEDDING_MODEL.get() {
            return Ok(model);
        }

        let _guard = LOAD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = EMBEDDING_MODEL.get() {
            return Ok(model);
        }

        tracing::info!(model = MODEL_NAME, "Loading embedding model (first use)...");
        let start = Instant::now();

        let options = fastembed::InitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2)
            .with_show_download_progress(false);
        let model =
            fastembed::TextEmbedding::try_new(options).map_err(|e| Error::OperationFailed {
                operation: "load_embedding_model".to_string(),
                cause: e.to_string(),
            })?;

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(elapsed_ms, model = MODEL_NAME, "Embedding model loaded");

        Ok(EMBEDDING_MODEL.get_or_init(|| Mutex::new(model)))
    }

    pub(super) fn embed(texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let model = get_model()?;
        let owned: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();

        // ONNX runtime can panic on malformed inputs or internal errors.
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut model = model.lock().unwrap_or_else(PoisonError::into_inner);
            model.embed(owned, None)
        }));

        result
            .map_err(|panic_info| {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(
                    panic_message = %panic_msg,
                    batch_size = texts.len(),
                    "ONNX runtime panicked during embedding"
                );
                Error::OperationFailed {
                    operation: "fastembed_embed".to_string(),
                    cause: format!("ONNX runtime panic: {panic_msg}"),
                }
            })?
            .map_err(|e| Error::OperationFailed {
                operation: "fastembed_embed".to_string(),
                cause: e.to_string(),
            })
    }
}

/// On-device embedder using all-MiniLM-L6-v2.
///
/// The model is shared across instances and loaded lazily on the first
/// non-empty embed call, which blocks while the ONNX model loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastEmbedEmbedder;

impl FastEmbedEmbedder {
    /// Embedding dimensions of all-MiniLM-L6-v2.
    pub const DEFAULT_DIMENSIONS: usize = DEFAULT_DIMENSIONS;

    /// Creates a new embedder. The model is not loaded yet.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the model name.
    #[must_use]
    pub const fn model_name(&self) -> &'static str {
        MODEL_NAME
    }
}

impl EmbeddingProvider for FastEmbedEmbedder {
    fn name(&self) -> &'static str {
        "fastembed"
    }

    fn dimensions(&self) -> usize {
        Self::DEFAULT_DIMENSIONS
    }

    #[cfg(feature = "fastembed-embeddings")]
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = native::embed(texts)?;
        super::ensure_count("fastembed_embed", texts.len(), vectors)
    }

    #[cfg(not(feature = "fastembed-embeddings"))]
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Err(crate::Error::FeatureNotEnabled(
            "fastembed-embeddings".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "fastembed-embeddings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata() {
        let embedder = FastEmbedEmbedder::new();
        assert_eq!(embedder.dimensions(), 384);
        assert_eq!(embedder.name(), "fastembed");
        assert_eq!(embedder.model_name(), "all-MiniLM-L6-v2");
    }

    #[test]
    fn test_empty_input() {
        let vectors = FastEmbedEmbedder::new().embed(&[]).expect("empty input");
        assert!(vectors.is_empty());
    }

    #[cfg(not(feature = "fastembed-embeddings"))]
    #[test]
    fn test_without_feature() {
        let embedder = FastEmbedEmbedder::new();
        assert!(!embedder.is_available());
        let err = embedder.embed(&["text"]).expect_err("feature disabled");
        assert!(matches!(err, crate::Error::FeatureNotEnabled(_)));
    }
}
