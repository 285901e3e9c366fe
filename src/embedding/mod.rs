//! Embedding providers for semantic similarity.
//!
//! The scorer only sees the [`EmbeddingProvider`] trait. Four backends
//! implement it:
//!
//! | Backend | Kind | Availability |
//! |---------|------|--------------|
//! | [`NeutralEmbedder`] | no-op | always |
//! | [`OllamaEmbedder`] | local server | server answers and has the model |
//! | [`FastEmbedEmbedder`] | on-device | `fastembed-embeddings` feature |
//! | [`OpenAiEmbedder`] | remote API | API key configured |
//!
//! Backends are picked once at startup by [`factory::create_provider`].

// Embedding math works in f32 while scores are f64.
#![allow(clippy::cast_precision_loss)]

pub mod factory;
mod fastembed;
mod http;
mod neutral;
mod ollama;
mod openai;

pub use factory::{EmbeddingBackend, EmbeddingConfig, create_provider, select_first_available};
pub use fastembed::FastEmbedEmbedder;
pub use http::{EmbeddingHttpConfig, build_http_client};
pub use neutral::NeutralEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;

use crate::Result;

/// Default embedding dimensions (all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Capability for generating and comparing text embeddings.
///
/// Implementations block on I/O; callers that need async wrap calls in
/// their own worker threads.
pub trait EmbeddingProvider: Send + Sync {
    /// Short backend name for logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Returns the embedding dimensions.
    fn dimensions(&self) -> usize;

    /// Embeds `texts`, one vector per text, in input order.
    ///
    /// Returns an empty vector for empty input.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or returns a different number
    /// of vectors than texts.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Cosine similarity in `[-1, 1]`.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }

    /// Returns true if the backend can serve requests right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Returns true for the no-op backend, whose vectors carry no signal.
    fn is_neutral(&self) -> bool {
        false
    }
}

/// Calculates cosine similarity between two vectors.
///
/// Returns 0.0 for empty vectors, vectors of different length, a
/// zero-norm vector, or vectors holding NaN or infinite components.
///
/// # Example
///
/// ```rust
/// use jobsift::embedding::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
/// assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
/// assert!(cosine_similarity(&[], &[]).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    let cosine = dot / denom;
    if denom == 0.0 || !cosine.is_finite() {
        return 0.0;
    }
    cosine.clamp(-1.0, 1.0)
}

/// Checks that a backend returned exactly one vector per input text.
pub(crate) fn ensure_count(
    operation: &str,
    expected: usize,
    vectors: Vec<Vec<f32>>,
) -> Result<Vec<Vec<f32>>> {
    if vectors.len() == expected {
        Ok(vectors)
    } else {
        Err(crate::Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("expected {expected} embeddings, got {}", vectors.len()),
        })
    }
}
