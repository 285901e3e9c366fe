//! Benchmarks for fingerprinting, deduplication, and batch scoring.
//!
//! Benchmark targets:
//! - Fingerprint of a typical posting: <20µs
//! - Dedup of 1,000 postings: <50ms
//! - Neutral batch scoring of 1,000 postings: <20ms

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::cast_possible_wrap)]

use chrono::{TimeDelta, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use jobsift::embedding::NeutralEmbedder;
use jobsift::models::{JobPosting, MatchingProfile, SourceSystem};
use jobsift::services::deduplication::{
    DeduplicationConfig, Deduplicator, fingerprint, normalize,
};
use jobsift::services::{KeywordScorer, Scorer};

// ============================================================================
// Test Data
// ============================================================================

const DESCRIPTION: &str = "We are looking for a backend engineer to design and operate \
    rust services on postgres. You will own our ingestion pipeline, work with product \
    on new features, and keep latency low for customers in Europe and North America.";

const TITLES: [&str; 5] = [
    "Backend Engineer",
    "Senior Backend Engineer",
    "Data Engineer",
    "Product Manager",
    "Site Reliability Engineer",
];

fn postings(count: usize) -> Vec<JobPosting> {
    let now = Utc::now();
    (0..count)
        .map(|i| {
            JobPosting::new(
                format!("Company {}", i % 50),
                SourceSystem::Greenhouse,
                i.to_string(),
                TITLES[i % TITLES.len()],
            )
            .with_location(if i % 3 == 0 { "Berlin" } else { "Remote" })
            .with_description(format!("{DESCRIPTION} Req {i}"))
            .with_posted_at(now - TimeDelta::hours((i % 720) as i64))
        })
        .collect()
}

fn profile() -> MatchingProfile {
    MatchingProfile {
        desired_roles: vec!["Backend Engineer".to_string(), "Data Engineer".to_string()],
        must_have_keywords: vec![
            "rust".to_string(),
            "postgres".to_string(),
            "kafka".to_string(),
        ],
        must_not_keywords: vec!["clearance".to_string()],
        preferred_locations: vec!["Berlin".to_string()],
        ..MatchingProfile::default()
    }
}

// ============================================================================
// Fingerprinting
// ============================================================================

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    let text = postings(1)[0].searchable_text();

    group.bench_function("normalize", |b| b.iter(|| normalize(black_box(&text))));
    group.throughput(Throughput::Elements(1));
    group.bench_function("simhash", |b| b.iter(|| fingerprint(black_box(&text))));
    group.finish();
}

// ============================================================================
// Deduplication
// ============================================================================

fn bench_dedupe(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedupe");

    for size in [100usize, 1_000] {
        let jobs = postings(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("batch", size), &jobs, |b, jobs| {
            b.iter(|| {
                let dedup = Deduplicator::new(DeduplicationConfig::default()).unwrap();
                dedup.dedupe(black_box(jobs.clone()))
            });
        });
    }
    group.finish();
}

// ============================================================================
// Scoring
// ============================================================================

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    let keyword = KeywordScorer::new(&profile()).unwrap();
    let sample = postings(1);
    group.bench_function("keyword", |b| b.iter(|| keyword.score(black_box(&sample[0]))));

    let scorer = Scorer::new(profile(), Arc::new(NeutralEmbedder::new())).unwrap();
    for size in [100usize, 1_000] {
        let jobs = postings(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("batch", size), &jobs, |b, jobs| {
            b.iter(|| scorer.score_batch(black_box(jobs), Some(0.0)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fingerprint, bench_dedupe, bench_scoring);
criterion_main!(benches);
