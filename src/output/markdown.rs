//! Markdown rendering of audit results
//!
//! Produces a human-readable report: score and summary first, then every
//! finding in report order with its status, tier and fix.

use crate::audit::{AuditFailure, AuditReport, Finding, Status};
use crate::history::AuditRecord;

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Passed => "✅",
        Status::Warning => "⚠️",
        Status::Critical => "❌",
    }
}

/// Escapes characters that would break a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn finding_row(finding: &Finding) -> String {
    let title = if finding.tier.is_premium() {
        format!("{} (premium)", cell(&finding.title))
    } else {
        cell(&finding.title)
    };
    let fix = if finding.fix.is_empty() {
        "-".to_string()
    } else {
        cell(&finding.fix)
    };

    format!(
        "| {} {} | {} | {} | {} |\n",
        status_icon(finding.status),
        finding.status,
        title,
        cell(&finding.message),
        fix
    )
}

/// Formats a full audit report as markdown
pub fn format_markdown_report(report: &AuditReport) -> String {
    let mut md = String::new();

    md.push_str("# SEO Audit Report\n\n");
    md.push_str(&format!("- **URL**: {}\n", report.url));
    md.push_str(&format!("- **Score**: {}/100\n", report.score));
    md.push_str(&format!("- **Response time**: {} ms\n\n", report.latency_ms));

    md.push_str("## Summary\n\n");
    md.push_str("| Status | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Passed | {} |\n", report.summary.passed));
    md.push_str(&format!("| Warning | {} |\n", report.summary.warning));
    md.push_str(&format!("| Critical | {} |\n\n", report.summary.critical));

    md.push_str("## Findings\n\n");
    md.push_str("| Status | Check | Result | Fix |\n");
    md.push_str("|--------|-------|--------|-----|\n");
    for finding in &report.findings {
        md.push_str(&finding_row(finding));
    }

    let details: Vec<&Finding> = report
        .findings
        .iter()
        .filter(|finding| finding.detail.is_some())
        .collect();
    if !details.is_empty() {
        md.push_str("\n## Diagnostics\n\n");
        for finding in details {
            md.push_str(&format!(
                "- **{}**: {}\n",
                finding.title,
                finding.detail.as_deref().unwrap_or_default()
            ));
        }
    }

    md
}

/// Formats a fatal audit failure as markdown
pub fn format_markdown_failure(url: &str, failure: &AuditFailure) -> String {
    let mut md = String::new();

    md.push_str("# SEO Audit Failed\n\n");
    md.push_str(&format!("- **URL**: {}\n", url));
    md.push_str(&format!("- **Error**: {}\n", failure.message));
    if let Some(detail) = &failure.detail {
        md.push_str(&format!("- **Detail**: {}\n", detail));
    }

    md
}

/// Formats stored audits as a markdown table, newest first
pub fn format_markdown_history(identity: &str, records: &[AuditRecord]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Audit History for {}\n\n", identity));

    if records.is_empty() {
        md.push_str("No audits stored.\n");
        return md;
    }

    md.push_str("| Date | URL | Score | Passed | Warning | Critical |\n");
    md.push_str("|------|-----|-------|--------|---------|----------|\n");
    for record in records {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            cell(&record.url),
            record.score,
            record.summary.passed,
            record.summary.warning,
            record.summary.critical
        ));
    }

    md
}
