//! `clearance-checkr`: resolve the license clearance status of a project's dependencies.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and apply CLI overrides.
//! 3. Read every manifest into [`content_id::ContentId`]s ([`reader`]).
//! 4. Drop excluded ids ([`filter`]).
//! 5. Classify the rest against the clearance service ([`lookup`]).
//! 6. Feed the results to the collectors ([`collector`]).
//! 7. Exit `0` when everything is approved, `1` otherwise.

mod cli;
mod collector;
mod config;
mod content_id;
mod error;
mod filter;
mod license;
mod lookup;
mod models;
mod parser;
mod reader;

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use cli::{Cli, ReportFormat};
use collector::console::ConsoleCollector;
use collector::csv::CsvCollector;
use collector::json::JsonCollector;
use collector::{ExitStatus, ResultsCollector};
use config::load_config;
use error::CheckError;
use filter::ExclusionFilter;
use lookup::{Classifier, HttpClearanceSource, LookupSettings};
use models::LicenseData;
use reader::{read_manifest, ManifestKind};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project = std::env::current_dir().context("cannot determine working directory")?;
    let mut config =
        load_config(&project, cli.config.as_deref()).context("failed to load configuration")?;

    if let Some(batch) = cli.batch {
        config.clearance.batch_size = batch;
    }
    if let Some(concurrency) = cli.concurrency {
        config.clearance.max_concurrent = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.clearance.timeout_secs = timeout;
    }

    // Read all manifests before any lookup; a missing file ends the run here
    let kind = cli.format.as_ref().map(ManifestKind::from);
    let mut ids = Vec::new();
    let mut declared = HashMap::new();

    for file in &cli.files {
        let manifest = match read_manifest(file, kind) {
            Ok(manifest) => manifest,
            Err(e @ CheckError::NotFound { .. }) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", file)),
        };

        if !cli.quiet {
            eprintln!("  {} {} {} dependencies", "→".cyan(), file, manifest.ids.len());
        }

        ids.extend(manifest.ids);
        declared.extend(manifest.declared);
    }

    let filter = match &cli.exclude {
        Some(path) => ExclusionFilter::from_file(path).context("failed to load exclusions")?,
        None => ExclusionFilter::default(),
    };
    if !filter.is_empty() {
        let before = ids.len();
        ids.retain(|id| filter.keep(id));
        debug!(excluded = before - ids.len(), "applied exclusion patterns");
    }

    let source = HttpClearanceSource::new(config.clearance.url.clone(), config.clearance.request_timeout())?;
    let settings = LookupSettings::from(&config.clearance);
    let classifier = Classifier::new(source, config.policy, settings).with_progress(!cli.quiet);

    let results: Vec<LicenseData> = classifier.classify(&ids, &declared).await.into_values().collect();

    let mut collectors: Vec<Box<dyn ResultsCollector>> = Vec::new();
    match cli.report {
        ReportFormat::Terminal => collectors.push(Box::new(ConsoleCollector::new(cli.verbose, cli.quiet))),
        ReportFormat::Json => collectors.push(Box::new(JsonCollector::stdout())),
    }
    if let Some(path) = &cli.summary {
        collectors.push(Box::new(CsvCollector::create(path)?));
    }

    for data in &results {
        for collector in collectors.iter_mut() {
            collector.accept(data);
        }
    }
    for collector in collectors.iter_mut() {
        collector.close()?;
    }

    // Exit code: 1 if anything is restricted or needs review
    let status = ExitStatus::from_results(&results);
    if status != ExitStatus::Clear {
        std::process::exit(status.code());
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
