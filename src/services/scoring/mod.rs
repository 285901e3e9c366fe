//! Job ranking against a matching profile.
//!
//! Three signals feed the final score:
//! - **Keyword**: role, must-have, location, and remote rules, with must-not
//!   phrases excluding a posting outright
//! - **Recency**: concave decay over a configurable window
//! - **Vector**: cosine similarity between profile and posting embeddings,
//!   rescaled to `[0, 1]`, neutral (0.5) whenever unavailable
//!
//! [`Scorer`] blends them with the profile's weights. [`SemanticMatcher`]
//! ranks on the vector signal alone.

mod keyword;
mod profile_embedding;
mod recency;
mod scorer;
mod semantic;
mod time_filter;

pub use keyword::{KeywordMatch, KeywordScorer};
pub use recency::{DEFAULT_MAX_AGE_DAYS, NEUTRAL_RECENCY_SCORE, RecencyScorer};
pub use scorer::{DEFAULT_BATCH_SIZE, NEUTRAL_VECTOR_SCORE, Scorer};
pub use semantic::{SemanticMatcher, VectorMatch};
pub use time_filter::{Freshness, cutoff_time, filter_jobs_by_time, parse_time_filter};
