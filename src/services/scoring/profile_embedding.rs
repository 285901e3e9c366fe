//! Single-flight cache for a profile's embedding.

use crate::Result;
use crate::embedding::EmbeddingProvider;
use std::sync::{Arc, Mutex, PoisonError};

/// Lazily computed embedding of a fixed profile text.
///
/// The lock is held while the provider runs, so concurrent first callers
/// wait for one computation instead of racing. Failures are not cached and
/// the next caller retries. An empty text caches an empty vector without
/// calling the provider.
#[derive(Debug)]
pub(crate) struct ProfileEmbedding {
    text: String,
    cached: Mutex<Option<Arc<Vec<f32>>>>,
}

impl ProfileEmbedding {
    pub(crate) const fn new(text: String) -> Self {
        Self {
            text,
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached embedding, computing it on first use.
    pub(crate) fn get(&self, provider: &dyn EmbeddingProvider) -> Result<Arc<Vec<f32>>> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(embedding) = cached.as_ref() {
            return Ok(Arc::clone(embedding));
        }

        let embedding = if self.text.trim().is_empty() {
            Vec::new()
        } else {
            provider
                .embed(&[self.text.as_str()])?
                .into_iter()
                .next()
                .unwrap_or_default()
        };

        tracing::debug!(
            provider = provider.name(),
            dimensions = embedding.len(),
            "Computed profile embedding"
        );
        let embedding = Arc::new(embedding);
        *cached = Some(Arc::clone(&embedding));
        Ok(embedding)
    }
}
