//! Output module for rendering audit results
//!
//! This module handles:
//! - Rendering reports, failures and history as markdown
//! - Serializing them as JSON
//! - Writing the rendered text to a file or stdout

mod markdown;

pub use markdown::{format_markdown_failure, format_markdown_history, format_markdown_report};

use crate::audit::{AuditFailure, AuditReport};
use crate::history::AuditRecord;
use crate::AuditError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output format for rendered results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Serializes any result as pretty-printed JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AuditError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Renders a report in the requested format
pub fn render_report(report: &AuditReport, format: ReportFormat) -> Result<String, AuditError> {
    match format {
        ReportFormat::Markdown => Ok(format_markdown_report(report)),
        ReportFormat::Json => to_json(report),
    }
}

/// Renders a failure in the requested format
pub fn render_failure(
    url: &str,
    failure: &AuditFailure,
    format: ReportFormat,
) -> Result<String, AuditError> {
    match format {
        ReportFormat::Markdown => Ok(format_markdown_failure(url, failure)),
        ReportFormat::Json => to_json(failure),
    }
}

/// Renders stored audits in the requested format
pub fn render_history(
    identity: &str,
    records: &[AuditRecord],
    format: ReportFormat,
) -> Result<String, AuditError> {
    match format {
        ReportFormat::Markdown => Ok(format_markdown_history(identity, records)),
        ReportFormat::Json => to_json(records),
    }
}

/// Writes rendered output to `path`, or to stdout when no path is given
pub fn write_report(rendered: &str, path: Option<&Path>) -> Result<(), AuditError> {
    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
