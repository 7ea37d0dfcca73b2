//! Command-line parsing for the domain annotation + stratified sampling tool.
//!
//! Parsing is kept apart from the pipeline: `app` turns these args into
//! `AnnotateConfig` / `SampleConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::{DEFAULT_API_URL, DEFAULT_USER_AGENT};
use crate::sample::parse_cap;

pub const DEFAULT_RAW_INPUT: &str = "dataset_15k_batch.jsonl";
pub const DEFAULT_LABELED: &str = "dataset_15k_annotated_v2.jsonl";
pub const DEFAULT_SAMPLE: &str = "dataset_10k_stratified.jsonl";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "strata",
    version,
    about = "Label article records with a subject domain and draw a capped stratified sample"
)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch categories for every record and add a `domain` field.
    Annotate(AnnotateArgs),
    /// Draw a stratified sample from a labeled file.
    Sample(SampleArgs),
    /// Print the per-domain quota table without drawing anything.
    Plan(PlanArgs),
    /// Classify category names offline and show the keyword scores.
    Classify(ClassifyArgs),
    /// Annotate, then sample the labeled output.
    Run(RunArgs),
}

/// Category service options.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// MediaWiki API endpoint.
    #[arg(long, env = "STRATA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// User-Agent sent with every request (Wikimedia requires a contact).
    #[arg(long, env = "STRATA_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pause before each request, in milliseconds.
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Quota options.
#[derive(Debug, Args, Clone)]
pub struct QuotaArgs {
    /// Requested sample size.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub total: usize,

    /// Cap a domain at a percentage of the total, e.g. `--cap history=5`.
    /// Repeatable; overrides the built-in cap for that domain.
    #[arg(long = "cap", value_name = "DOMAIN=PCT", value_parser = parse_cap)]
    pub caps: Vec<(String, f64)>,

    /// Ignore the built-in cap table and use only `--cap` values.
    #[arg(long)]
    pub no_default_caps: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AnnotateArgs {
    /// Raw NDJSON records.
    #[arg(short, long, default_value = DEFAULT_RAW_INPUT)]
    pub input: PathBuf,

    /// Labeled NDJSON output.
    #[arg(short, long, default_value = DEFAULT_LABELED)]
    pub output: PathBuf,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Labeled NDJSON records.
    #[arg(short, long, default_value = DEFAULT_LABELED)]
    pub input: PathBuf,

    /// Sample NDJSON output.
    #[arg(short, long, default_value = DEFAULT_SAMPLE)]
    pub output: PathBuf,

    /// Random seed for the draws and the final shuffle.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub quota: QuotaArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PlanArgs {
    /// Labeled NDJSON records.
    #[arg(short, long, default_value = DEFAULT_LABELED)]
    pub input: PathBuf,

    #[command(flatten)]
    pub quota: QuotaArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    /// Category names, e.g. `Quantum_mechanics "Physical quantities"`.
    #[arg(required = true)]
    pub categories: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Raw NDJSON records.
    #[arg(short, long, default_value = DEFAULT_RAW_INPUT)]
    pub input: PathBuf,

    /// Intermediate labeled file.
    #[arg(long, default_value = DEFAULT_LABELED)]
    pub labeled: PathBuf,

    /// Sample NDJSON output.
    #[arg(short, long, default_value = DEFAULT_SAMPLE)]
    pub output: PathBuf,

    /// Random seed for the draws and the final shuffle.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub fetch: FetchArgs,

    #[command(flatten)]
    pub quota: QuotaArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn sample_defaults_match_pipeline_filenames() {
        let cli = Cli::parse_from(["strata", "sample"]);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.input, PathBuf::from(DEFAULT_LABELED));
        assert_eq!(args.output, PathBuf::from(DEFAULT_SAMPLE));
        assert_eq!(args.seed, 42);
        assert_eq!(args.quota.total, 10_000);
        assert!(args.quota.caps.is_empty());
    }

    #[test]
    fn repeated_caps_are_parsed() {
        let cli = Cli::parse_from([
            "strata", "plan", "--cap", "history=10", "--cap", "physics=2.5", "--no-default-caps",
        ]);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(
            args.quota.caps,
            vec![("history".to_string(), 10.0), ("physics".to_string(), 2.5)]
        );
        assert!(args.quota.no_default_caps);
    }

    #[test]
    fn bad_cap_is_rejected() {
        assert!(Cli::try_parse_from(["strata", "plan", "--cap", "history"]).is_err());
    }
}
