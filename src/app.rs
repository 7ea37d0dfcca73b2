//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - builds stage configs (caps merged and validated here)
//! - runs the annotation and/or sampling stages
//! - prints the reports

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::classify::{assign_domain, score_domains};
use crate::cli::{
    AnnotateArgs, ClassifyArgs, Command, FetchArgs, PlanArgs, QuotaArgs, RunArgs, SampleArgs,
};
use crate::data::WikipediaClient;
use crate::domain::{AnnotateConfig, DomainLabel, SampleConfig};
use crate::error::AppError;
use crate::sample::{default_caps, merge_caps, validate_caps};

pub mod pipeline;

/// Entry point for the `strata` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    crate::logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Annotate(args) => handle_annotate(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plan(args) => handle_plan(args),
        Command::Classify(args) => handle_classify(args),
        Command::Run(args) => handle_run(args),
    }
}

fn handle_annotate(args: AnnotateArgs) -> Result<(), AppError> {
    let config = annotate_config(args.input, args.output, &args.fetch);
    annotate(&config)
}

fn annotate(config: &AnnotateConfig) -> Result<(), AppError> {
    let client = WikipediaClient::from_config(config)?;
    let stats = pipeline::annotate_file(config, &client)?;

    println!("{}", crate::report::format_annotate_summary(&stats));
    println!("Annotated dataset saved to: {}", config.output.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config(args.input, args.output, args.seed, &args.quota)?;
    sample(&config)
}

fn sample(config: &SampleConfig) -> Result<(), AppError> {
    let run = pipeline::sample_file(config)?;
    println!("{}", crate::report::format_sample_summary(&run, config));
    Ok(())
}

fn handle_plan(args: PlanArgs) -> Result<(), AppError> {
    // Plan never writes a sample.
    let config = sample_config(args.input, PathBuf::new(), 0, &args.quota)?;
    let loaded = pipeline::load_pools(&config)?;
    let plan = pipeline::plan_quotas(&loaded.pools, &config);

    println!("{}", crate::report::format_quota_plan(&plan));
    Ok(())
}

fn handle_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let scores = score_domains(&args.categories);
    let label = DomainLabel::from(assign_domain(&args.categories));

    println!("{}", crate::report::format_scores(&args.categories, &scores, label));
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let annotate_cfg = annotate_config(args.input, args.labeled.clone(), &args.fetch);
    // Caps are checked before any request is sent.
    let sample_cfg = sample_config(args.labeled, args.output, args.seed, &args.quota)?;

    annotate(&annotate_cfg)?;
    info!(labeled = %sample_cfg.input.display(), "annotation finished; sampling");
    sample(&sample_cfg)
}

pub fn annotate_config(
    input: PathBuf,
    output: PathBuf,
    fetch: &FetchArgs,
) -> AnnotateConfig {
    AnnotateConfig {
        input,
        output,
        api_url: fetch.api_url.clone(),
        user_agent: fetch.user_agent.clone(),
        request_delay: Duration::from_millis(fetch.delay_ms),
        request_timeout: Duration::from_secs(fetch.timeout_secs),
    }
}

/// Build the sampler config, merging `--cap` overrides into the cap table.
pub fn sample_config(
    input: PathBuf,
    output: PathBuf,
    seed: u64,
    quota: &QuotaArgs,
) -> Result<SampleConfig, AppError> {
    let base = if quota.no_default_caps {
        Vec::new()
    } else {
        default_caps()
    };
    let caps = merge_caps(base, &quota.caps);
    validate_caps(&caps)?;

    Ok(SampleConfig {
        input,
        output,
        total: quota.total,
        seed,
        caps,
    })
}
