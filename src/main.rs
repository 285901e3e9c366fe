//! Binary entry point for jobsift.
//!
//! This binary provides the CLI interface for the jobsift matching engine.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use jobsift::cli::{self, DedupeOptions, OutputFormat, RankOptions};
use jobsift::config::JobsiftConfig;
use jobsift::embedding::EmbeddingBackend;
use jobsift::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Jobsift - job posting deduplication and ranking.
#[derive(Parser)]
#[command(name = "jobsift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "JOBSIFT_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Rank postings against a matching profile.
    Rank {
        /// JSON array of postings.
        #[arg(short, long)]
        jobs: PathBuf,

        /// Matching profile TOML (default: `[profile]` from the config).
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Minimum final score (default: the profile threshold).
        #[arg(long)]
        min_score: Option<f64>,

        /// Only postings from this window, e.g. 24h, 7d, 2w, 1m.
        #[arg(long)]
        since: Option<String>,

        /// File of job IDs seen by earlier runs, one per line.
        #[arg(long)]
        seen: Option<PathBuf>,

        /// Embedding backend: auto, none, ollama, fastembed, openai.
        #[arg(short, long)]
        backend: Option<EmbeddingBackend>,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format.
        #[arg(short, long, value_enum, ignore_case = true, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Drop duplicate postings and print the rest as JSON.
    Dedupe {
        /// JSON array of postings.
        #[arg(short, long)]
        jobs: PathBuf,

        /// File of job IDs seen by earlier runs, one per line.
        #[arg(long)]
        seen: Option<PathBuf>,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match JobsiftConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(config.logging_config(cli.verbose)) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &JobsiftConfig) -> anyhow::Result<()> {
    match command {
        Commands::Rank {
            jobs,
            profile,
            min_score,
            since,
            seen,
            backend,
            limit,
            format,
        } => {
            let options = RankOptions {
                jobs,
                profile,
                min_score,
                since,
                seen,
                backend,
                limit,
                format,
            };
            cli::cmd_rank(config, &options)
        },

        Commands::Dedupe { jobs, seen } => cli::cmd_dedupe(config, &DedupeOptions { jobs, seen }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank() {
        let cli = Cli::try_parse_from([
            "jobsift", "-v", "rank", "--jobs", "jobs.json", "--since", "7d", "--backend", "none",
            "--format", "json",
        ])
        .expect("parse");

        assert!(cli.verbose);
        assert!(matches!(
            &cli.command,
            Commands::Rank {
                since: Some(since),
                backend: Some(EmbeddingBackend::None),
                format: OutputFormat::Json,
                ..
            } if since == "7d"
        ));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from(["jobsift", "rank", "--jobs", "j.json", "--format", "csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result =
            Cli::try_parse_from(["jobsift", "rank", "--jobs", "j.json", "--backend", "bert"]);
        assert!(result.is_err());
    }
}
