//! End-to-end tests of the dedup and scoring pipeline.
//!
//! Uses deterministic in-process embedding providers so no model server
//! is needed.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{TimeDelta, Utc};
use jobsift::embedding::{
    EmbeddingBackend, EmbeddingConfig, EmbeddingProvider, NeutralEmbedder, create_provider,
};
use jobsift::models::{JobId, JobPosting, MatchingProfile, RemoteType, SourceSystem};
use jobsift::services::deduplication::{
    DeduplicationConfig, Deduplicator, DuplicateReason, normalize,
};
use jobsift::services::{Scorer, SemanticMatcher};
use jobsift::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const DIMENSIONS: usize = 64;

/// Hashed bag-of-words vectors.
#[derive(Default)]
struct BagOfWords {
    calls: AtomicUsize,
}

impl EmbeddingProvider for BagOfWords {
    fn name(&self) -> &'static str {
        "bag-of-words"
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; DIMENSIONS];
                for word in normalize(text).split_whitespace() {
                    let bucket = word
                        .bytes()
                        .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(usize::from(b)));
                    vector[bucket % DIMENSIONS] += 1.0;
                }
                vector
            })
            .collect())
    }
}

/// Always fails.
struct Failing;

impl EmbeddingProvider for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(Error::OperationFailed {
            operation: "embed".to_string(),
            cause: "connection refused".to_string(),
        })
    }
}

/// Emits vectors holding NaN, optionally with a NaN similarity as well.
struct NanVectors {
    nan_similarity: bool,
}

impl EmbeddingProvider for NanVectors {
    fn name(&self) -> &'static str {
        "nan-vectors"
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![f32::NAN, 1.0]).collect())
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        if self.nan_similarity {
            f32::NAN
        } else {
            jobsift::embedding::cosine_similarity(a, b)
        }
    }
}

fn profile() -> MatchingProfile {
    MatchingProfile {
        name: "backend".to_string(),
        desired_roles: vec!["Backend Engineer".to_string()],
        must_have_keywords: vec!["rust".to_string(), "postgres".to_string()],
        must_not_keywords: vec!["clearance".to_string()],
        preferred_locations: vec!["Berlin".to_string()],
        remote_preference: Some(RemoteType::Remote),
        min_score_threshold: 0.2,
        ..MatchingProfile::default()
    }
}

fn postings() -> Vec<JobPosting> {
    let now = Utc::now();
    vec![
        JobPosting::new("Acme", SourceSystem::Greenhouse, "101", "Backend Engineer")
            .with_location("Berlin, Germany")
            .with_remote_type(RemoteType::Remote)
            .with_description("Build rust services on postgres")
            .with_posted_at(now - TimeDelta::hours(5)),
        // Same posting fetched twice.
        JobPosting::new("Acme", SourceSystem::Greenhouse, "101", "Backend Engineer")
            .with_location("Berlin, Germany")
            .with_remote_type(RemoteType::Remote)
            .with_description("Build rust services on postgres")
            .with_posted_at(now - TimeDelta::hours(5)),
        JobPosting::new("Beta", SourceSystem::Lever, "b-7", "Marketing Manager")
            .with_description("Own brand campaigns and events")
            .with_posted_at(now - TimeDelta::days(20)),
        JobPosting::new("Gamma", SourceSystem::Ashby, "g-1", "Backend Engineer")
            .with_description("Rust and postgres, security clearance required")
            .with_posted_at(now - TimeDelta::days(1)),
        JobPosting::new("Delta", SourceSystem::Workday, "d-3", "Senior Backend Engineer")
            .with_description("Rust microservices")
            .with_posted_at(now - TimeDelta::days(3)),
    ]
}

#[test]
fn test_dedupe_then_rank() {
    let dedup = Deduplicator::new(DeduplicationConfig::default()).expect("dedup");
    let unique = dedup.dedupe(postings());
    assert_eq!(unique.len(), 4);

    let scorer = Scorer::new(profile(), Arc::new(BagOfWords::default())).expect("scorer");
    let ranked = scorer.score_batch(&unique, None);

    let companies: Vec<&str> = ranked.iter().map(|s| s.job.company()).collect();
    assert_eq!(companies.first(), Some(&"Acme"));
    assert!(!companies.contains(&"Gamma"), "excluded posting must not be ranked");
    assert!(ranked.windows(2).all(|w| w[0].final_score >= w[1].final_score));

    let top = &ranked[0];
    assert!(top.vector_score > 0.6);
    assert!((top.keyword_score - 1.0).abs() < 1e-9);
    assert!(top.match_reasons.iter().any(|r| r.starts_with("High semantic similarity")));
    assert!(top.match_reasons.contains(&"Recently posted".to_string()));
    assert!(top.match_reasons.contains(&"Location: Berlin".to_string()));
}

#[test]
fn test_failing_provider_degrades_to_neutral() {
    let scorer = Scorer::new(profile(), Arc::new(Failing)).expect("scorer");
    assert!(scorer.precompute_profile_embedding().is_err());

    let ranked = scorer.score_batch(&postings(), Some(0.0));
    // Gamma is excluded with a final score of 0, which still meets 0.0.
    assert_eq!(ranked.len(), 5);
    for scored in ranked.iter().filter(|s| !s.excluded) {
        assert!((scored.vector_score - 0.5).abs() < f64::EPSILON);
    }
}

#[test]
fn test_non_finite_embeddings_degrade_to_neutral() {
    for nan_similarity in [false, true] {
        let scorer = Scorer::new(profile(), Arc::new(NanVectors { nan_similarity }))
            .expect("scorer");

        let single = scorer.score(&postings()[0]);
        assert!((single.vector_score - 0.5).abs() < f64::EPSILON);
        assert!((0.0..=1.0).contains(&single.final_score));

        let ranked = scorer.score_batch(&postings(), Some(0.0));
        assert_eq!(ranked.len(), 5);
        for scored in &ranked {
            assert!((0.0..=1.0).contains(&scored.final_score));
            if !scored.excluded {
                assert!((scored.vector_score - 0.5).abs() < f64::EPSILON);
            }
        }
    }
}

#[test]
fn test_neutral_backend_from_factory() {
    let provider = create_provider(&EmbeddingConfig::for_backend(EmbeddingBackend::None));
    assert!(provider.is_neutral());

    let scorer = Scorer::new(profile(), provider).expect("scorer");
    scorer.precompute_profile_embedding().expect("neutral precompute is a no-op");
    let scored = scorer.score(&postings()[0]);
    assert!((scored.vector_score - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_parallel_scoring_after_precompute() {
    let provider = Arc::new(BagOfWords::default());
    let scorer = Arc::new(Scorer::new(profile(), provider.clone()).expect("scorer"));
    scorer.precompute_profile_embedding().expect("precompute");

    let jobs = postings();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let scorer = Arc::clone(&scorer);
            let jobs = &jobs;
            scope.spawn(move || {
                for job in jobs {
                    let scored = scorer.score(job);
                    assert!((0.0..=1.0).contains(&scored.final_score));
                }
            });
        }
    });

    // One profile call, then one call per non-excluded job per thread.
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1 + 4 * 4);
}

#[test]
fn test_cross_run_dedup_with_existence_check() {
    let stored: JobId = postings()[0].id();
    let dedup = Deduplicator::new(DeduplicationConfig::default())
        .expect("dedup")
        .with_existence_check(Arc::new(move |id: &JobId| *id == stored));

    let first = dedup.check(&postings()[0]);
    assert!(first.is_duplicate);
    assert_eq!(first.reason, Some(DuplicateReason::ExistingRecord));
    assert!(!dedup.is_duplicate(&postings()[2]));
}

#[test]
fn test_semantic_matcher_ranks_by_similarity() {
    let matcher = SemanticMatcher::new(profile(), Arc::new(BagOfWords::default()));
    let unique = Deduplicator::new(DeduplicationConfig::default())
        .expect("dedup")
        .dedupe(postings());

    let matches = matcher.match_jobs(&unique, 0.0).expect("match");
    assert_eq!(matches.len(), unique.len());
    assert_eq!(matches[0].rank, 1);
    assert_ne!(matches[0].job.company(), "Beta");
    assert!(matches.windows(2).all(|w| w[0].similarity >= w[1].similarity));

    let neutral = SemanticMatcher::new(profile(), Arc::new(NeutralEmbedder::new()));
    let matches = neutral.match_jobs(&unique, 0.9).expect("match");
    assert!(matches.iter().all(|m| (m.similarity - 0.5).abs() < f64::EPSILON));
}
