//! `modlicense`: list a Go module's dependencies with their source
//! repositories and licenses.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and load config ([`config::load_config`]).
//! 2. Refuse `--thanks` without a GitHub token ([`enrich::Orchestrator::new`]).
//! 3. Read `go.mod` ([`analyzer::gomod`]).
//! 4. Resolve each module to a repository ([`resolver`]).
//! 5. Fetch licenses with at most five requests in flight ([`enrich`], [`registry`]).
//! 6. Render the report ([`report`]) and optionally write license texts.

mod analyzer;
mod cli;
mod config;
mod detector;
mod enrich;
mod error;
mod license;
mod logging;
mod models;
mod registry;
mod report;
mod resolver;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use analyzer::gomod::GoModAnalyzer;
use analyzer::Analyzer;
use cli::{Cli, OutputTarget};
use config::load_config;
use enrich::Orchestrator;
use registry::LicenseClient;
use report::licenses::write_license_files;
use resolver::Resolver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;
    logging::init_logging(cli.log_filter().or(config.logging.filter.as_deref()));

    let client = LicenseClient::new(&config, config.github_token(), cli.thanks)?;
    let has_credential = client.has_credential();
    let orchestrator = Orchestrator::new(
        Arc::new(client),
        cli.thanks,
        has_credential,
        &config.github.token_env,
    )?;

    let modules = GoModAnalyzer::new(cli.indirect).analyze(&path)?;
    info!("Found {} dependencies", modules.len());

    let repos = Resolver::new().resolve_all(&modules);

    let orchestrator = if cli.quiet {
        orchestrator
    } else {
        orchestrator.with_progress(progress_bar(repos.len() as u64)?)
    };
    let repos = orchestrator.run(repos).await;

    match cli.output {
        OutputTarget::Stdout => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            report::render(&repos, cli.format, true, &mut out)?;
        }
        OutputTarget::File => {
            let target = cli.report_path();
            let file = File::create(&target)
                .with_context(|| format!("cannot create {}", target.display()))?;
            let mut out = BufWriter::new(file);
            report::render(&repos, cli.format, false, &mut out)?;
            out.flush()?;

            if !cli.quiet {
                eprintln!("  {} report written to {}", "✓".green(), target.display());
            }
        }
    }

    if cli.write_licenses {
        let written = write_license_files(&path, &repos)?;
        if !cli.quiet {
            eprintln!(
                "  {} {} license files written to {}",
                "✓".green(),
                written,
                path.join(report::licenses::LICENSES_DIR).display()
            );
        }
    }

    Ok(())
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
