//! Audit orchestration
//!
//! This module ties the pipeline together:
//! - Normalizing the target and fetching the page
//! - Running the on-page checks against the parsed document
//! - Running the auxiliary network checks concurrently
//! - Folding every finding into the final report

mod checks;
mod finding;
mod network;
mod pagespeed;
mod report;
mod score;

pub use checks::{
    run_page_checks, AuditContext, PageCheck, PAGE_CHECKS, SLOW_RESPONSE_MS, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS, URL_MAX_CHARS,
};
pub use finding::{Finding, Status, Tier};
pub use network::{check_links, check_robots, check_sitemap, collect_links, run_network_checks};
pub use pagespeed::{
    bucket, check_performance, metrics_findings, normalize_category_score, Metric,
    PerformanceMetrics,
};
pub use report::{AuditFailure, AuditReport, UNREACHABLE_MESSAGE};
pub use score::{Scorecard, Summary, INITIAL_SCORE};

use crate::config::Config;
use crate::document::Document;
use crate::fetch::{build_http_client, fetch_page};
use crate::url::AuditRequest;
use crate::AuditError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Runs audits with a fixed configuration and a shared HTTP client
///
/// One auditor can serve any number of audits, concurrently or not; no state
/// is kept between them.
#[derive(Debug, Clone)]
pub struct Auditor {
    config: Config,
    client: Client,
}

impl Auditor {
    /// Creates an auditor from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Auditor)` - Ready to audit
    /// * `Err(AuditError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, AuditError> {
        let client = build_http_client(&config.fetch)?;
        Ok(Self { config, client })
    }

    /// Audits a single page
    ///
    /// Only a failure to normalize or fetch the page aborts the audit. Every
    /// auxiliary check settles into a finding of its own.
    ///
    /// # Returns
    ///
    /// * `Ok(AuditReport)` - Findings, score and summary
    /// * `Err(AuditFailure)` - The page could not be fetched
    pub async fn analyze(&self, url: &str) -> Result<AuditReport, AuditFailure> {
        let request = AuditRequest::new(url).map_err(|e| {
            let error = AuditError::from(e);
            tracing::warn!("Rejected audit target {:?}: {}", url, error);
            AuditFailure::unreachable(&error)
        })?;

        tracing::info!("Auditing {}", request.as_str());

        let page_timeout = Duration::from_secs(self.config.fetch.page_timeout_secs);
        let page = fetch_page(&self.client, request.as_str(), page_timeout)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to fetch {}: {}", request.as_str(), e);
                AuditFailure::unreachable(&e)
            })?;

        let document = Document::parse(&page.body);
        let context = AuditContext {
            url: request.as_str().to_string(),
            latency_ms: page.latency_ms,
        };
        let mut findings = run_page_checks(&document, &context);

        let base_url = Url::parse(&page.final_url).unwrap_or_else(|_| request.url().clone());
        findings.extend(
            run_network_checks(&self.client, &self.config, &request, &base_url, &document).await,
        );

        let report = AuditReport::assemble(request.as_str(), findings, page.latency_ms);

        tracing::info!(
            "Audit of {} finished: score {} ({} passed, {} warning, {} critical)",
            report.url,
            report.score,
            report.summary.passed,
            report.summary.warning,
            report.summary.critical
        );

        Ok(report)
    }
}

/// Audits a single page with the default configuration
///
/// # Example
///
/// ```no_run
/// # async fn run() {
/// match seo_audit::analyze("example.com").await {
///     Ok(report) => println!("score {}", report.score),
///     Err(failure) => eprintln!("{}", failure.message),
/// }
/// # }
/// ```
pub async fn analyze(url: &str) -> Result<AuditReport, AuditFailure> {
    let auditor = Auditor::new(Config::default()).map_err(|e| {
        tracing::error!("Failed to build HTTP client: {}", e);
        AuditFailure::new("Could not start the audit.", Some(e.to_string()))
    })?;

    auditor.analyze(url).await
}
