//! seo-audit main entry point
//!
//! Command-line driver: audits one page, prints the report and optionally
//! records it in the audit history.

use anyhow::Context;
use clap::Parser;
use seo_audit::config::{load_config_with_hash, Config};
use seo_audit::history::{HistoryRepository, SqliteHistory};
use seo_audit::output::{render_failure, render_history, render_report, write_report, ReportFormat};
use seo_audit::Auditor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// seo-audit: on-page SEO audit for a single URL
///
/// Fetches the page, checks its on-page signals, robots.txt, sitemap.xml,
/// outbound links and (with an API key) PageSpeed performance, then prints
/// a 0-100 score with every finding.
#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(version)]
#[command(about = "On-page SEO audit for a single URL", long_about = None)]
struct Cli {
    /// URL or bare domain to audit
    #[arg(value_name = "URL", required_unless_present = "history")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
    format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// SQLite database recording finished audits
    #[arg(long, value_name = "FILE")]
    history_db: Option<PathBuf>,

    /// Who the audit is recorded for
    #[arg(long, value_name = "ID", default_value = "anonymous")]
    identity: String,

    /// Print stored audits for the identity and exit
    #[arg(long)]
    history: bool,

    /// PageSpeed Insights API key; enables the performance probe
    #[arg(long, env = "PAGESPEED_API_KEY", hide_env_values = true)]
    pagespeed_key: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.history {
        handle_history(&cli, &config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let url = cli.url.as_deref().unwrap_or_default();
    handle_audit(&cli, config, url).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_audit=info,warn"),
            1 => EnvFilter::new("seo_audit=debug,info"),
            2 => EnvFilter::new("seo_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if given, then applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No config file given, using defaults");
            Config::default()
        }
    };

    if let Some(key) = &cli.pagespeed_key {
        config.performance.api_key = Some(key.clone());
    }
    if let Some(path) = &cli.history_db {
        config.history.database_path = Some(path.display().to_string());
    }

    Ok(config)
}

fn open_history(config: &Config) -> anyhow::Result<Option<SqliteHistory>> {
    let Some(path) = config.history.database_path.as_deref() else {
        return Ok(None);
    };

    let history = SqliteHistory::new(Path::new(path))
        .with_context(|| format!("failed to open history database {}", path))?;
    Ok(Some(history))
}

/// Handles `--history`: prints the stored audits for the identity
fn handle_history(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let history = open_history(config)?
        .context("--history needs a history database (--history-db or [history] database-path)")?;

    let records = history
        .find_history(&cli.identity)
        .context("failed to read audit history")?;
    tracing::info!("Found {} stored audit(s) for {}", records.len(), cli.identity);

    let rendered = render_history(&cli.identity, &records, cli.format)?;
    write_report(&rendered, cli.output.as_deref())?;
    Ok(())
}

/// Runs one audit, prints it and records it when a history is configured
async fn handle_audit(cli: &Cli, config: Config, url: &str) -> anyhow::Result<ExitCode> {
    let mut history = open_history(&config)?;
    let auditor = Auditor::new(config).context("failed to initialize the auditor")?;

    match auditor.analyze(url).await {
        Ok(report) => {
            if let Some(history) = history.as_mut() {
                let record = history
                    .save(&cli.identity, &report)
                    .context("failed to record the audit")?;
                tracing::info!("Recorded audit {} for {}", record.id, record.identity);
            }

            let rendered = render_report(&report, cli.format)?;
            write_report(&rendered, cli.output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            tracing::error!("Audit of {} failed: {}", url, failure);

            let rendered = render_failure(url, &failure, cli.format)?;
            write_report(&rendered, cli.output.as_deref())?;
            Ok(ExitCode::FAILURE)
        }
    }
}
