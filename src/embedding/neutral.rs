//! No-op embedding backend.

use super::{DEFAULT_DIMENSIONS, EmbeddingProvider};
use crate::Result;

/// Backend used when no semantic model is configured.
///
/// Returns zero vectors and a constant 0.5 similarity, so the vector signal
/// contributes the neutral score for every job.
///
/// # Example
///
/// ```rust
/// use jobsift::embedding::{EmbeddingProvider, NeutralEmbedder};
///
/// let neutral = NeutralEmbedder::new();
/// let vectors = neutral.embed(&["anything"]).unwrap();
/// assert!(vectors[0].iter().all(|x| *x == 0.0));
/// assert!((neutral.similarity(&vectors[0], &vectors[0]) - 0.5).abs() < f32::EPSILON);
/// assert!(neutral.is_neutral());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NeutralEmbedder {
    dimensions: usize,
}

impl NeutralEmbedder {
    /// Creates a neutral embedder with the default dimensions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Creates a neutral embedder producing vectors of `dimensions`.
    #[must_use]
    pub const fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for NeutralEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for NeutralEmbedder {
    fn name(&self) -> &'static str {
        "neutral"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; self.dimensions]).collect())
    }

    fn similarity(&self, _a: &[f32], _b: &[f32]) -> f32 {
        0.5
    }

    fn is_neutral(&self) -> bool {
        true
    }
}
