//! CLI command implementations.
//!
//! This module provides the command-line interface for jobsift. Each
//! submodule implements one command; `main.rs` only parses arguments.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rank` | Time-filter, deduplicate, score, and print ranked postings |
//! | `dedupe` | Deduplicate postings and print the unique ones as JSON |
//!
//! # Example Usage
//!
//! ```bash
//! # Rank last week's postings with the profile from a file
//! jobsift rank --jobs jobs.json --profile profile.toml --since 7d
//!
//! # Skip postings already stored by a previous run
//! jobsift dedupe --jobs jobs.json --seen seen-ids.txt > unique.json
//! ```

mod dedupe;
mod input;
mod rank;

pub use dedupe::{DedupeOptions, DedupeReport, cmd_dedupe, run_dedupe};
pub use input::{load_jobs, load_profile, load_seen_ids};
pub use rank::{OutputFormat, RankOptions, cmd_rank, run_rank, write_json, write_table};
