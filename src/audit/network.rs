//! Auxiliary network checks
//!
//! robots.txt, sitemap.xml, broken links and the optional performance probe
//! run concurrently. Each check turns its own failures into a finding, so
//! joining them is a settle-all barrier: nothing here can abort the audit.

use crate::audit::finding::Finding;
use crate::audit::pagespeed::check_performance;
use crate::config::Config;
use crate::document::Document;
use crate::fetch::{probe, probe_text, ProbeOutcome};
use crate::robots::{RobotsTxt, GENERIC_AGENT};
use crate::url::{resolve_link, AuditRequest};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Runs every auxiliary check and returns their findings in fixed order:
/// robots.txt, sitemap.xml, broken links, then performance.
///
/// `base_url` is the URL links on the page are resolved against, normally
/// the final URL after redirects.
pub async fn run_network_checks(
    client: &Client,
    config: &Config,
    request: &AuditRequest,
    base_url: &Url,
    document: &Document,
) -> Vec<Finding> {
    let probe_timeout = Duration::from_secs(config.fetch.probe_timeout_secs);
    let links = collect_links(document, base_url, config.links.max_links);

    tracing::debug!(
        "Running network checks for {} ({} links to check)",
        request.as_str(),
        links.len()
    );

    let (robots, sitemap, broken_links, performance) = tokio::join!(
        check_robots(client, request, probe_timeout),
        check_sitemap(client, request, probe_timeout),
        check_links(client, links, config.links.max_concurrent, probe_timeout),
        check_performance(client, &config.performance, request.as_str()),
    );

    let mut findings = vec![robots, sitemap, broken_links];
    findings.extend(performance);
    findings
}

/// Checks that `{origin}/robots.txt` exists
///
/// When it does, the message also says whether the audited page is open to
/// generic crawlers and how many sitemaps the file declares.
pub async fn check_robots(client: &Client, request: &AuditRequest, timeout: Duration) -> Finding {
    const TITLE: &str = "robots.txt";

    let url = request.origin_file("robots.txt");
    let (outcome, body) = probe_text(client, &url, timeout).await;

    if !outcome.is_success() {
        return Finding::warning(
            TITLE,
            "robots.txt not found.",
            "Add a robots.txt at the site root to guide search engine crawlers.",
        )
        .premium()
        .with_detail(outcome.diagnostic());
    }

    let robots = RobotsTxt::from_content(body.as_deref().unwrap_or_default());
    let access = if robots.allows(request.url().as_str(), GENERIC_AGENT) {
        "the audited page is open to crawlers"
    } else {
        "it blocks crawlers from the audited page"
    };
    let sitemaps = robots.sitemaps().len();

    Finding::passed(
        TITLE,
        format!(
            "robots.txt found; {} ({} sitemap(s) declared).",
            access, sitemaps
        ),
    )
    .premium()
}

/// Checks that `{origin}/sitemap.xml` exists
pub async fn check_sitemap(client: &Client, request: &AuditRequest, timeout: Duration) -> Finding {
    const TITLE: &str = "sitemap.xml";

    let url = request.origin_file("sitemap.xml");
    let outcome = probe(client, &url, timeout).await;

    let finding = if outcome.is_success() {
        Finding::passed(TITLE, "sitemap.xml found.")
    } else {
        Finding::warning(
            TITLE,
            "sitemap.xml not found.",
            "Publish a sitemap.xml and reference it from robots.txt.",
        )
        .with_detail(outcome.diagnostic())
    };
    finding.premium()
}

/// Collects the links worth checking
///
/// Hrefs are resolved against `base_url`; fragments, `javascript:`,
/// `mailto:`, `tel:` and non-http(s) links are skipped. Duplicates are
/// dropped keeping first-seen order, and at most `max_links` are returned.
pub fn collect_links(document: &Document, base_url: &Url, max_links: usize) -> Vec<Url> {
    let mut seen = HashSet::new();

    document
        .links
        .iter()
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|link| seen.insert(link.as_str().to_string()))
        .take(max_links)
        .collect()
}

/// Checks links concurrently, at most `max_concurrent` at a time
///
/// A link is broken only when a response arrives with status >= 400.
/// Timeouts and connection errors are not counted as broken.
pub async fn check_links(
    client: &Client,
    links: Vec<Url>,
    max_concurrent: usize,
    timeout: Duration,
) -> Finding {
    const TITLE: &str = "Broken links";

    if links.is_empty() {
        return Finding::passed(TITLE, "No links to check.").premium();
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for (index, link) in links.iter().enumerate() {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let url = link.to_string();

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let outcome = probe(&client, &url, timeout).await;
            (index, url, outcome)
        });
    }

    let mut results = Vec::with_capacity(links.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::warn!("Link check task failed: {}", e),
        }
    }
    results.sort_by_key(|(index, _, _)| *index);

    let broken: Vec<(String, String)> = results
        .iter()
        .filter(|(_, _, outcome)| is_broken(outcome))
        .map(|(_, url, outcome)| (url.clone(), outcome.diagnostic()))
        .collect();

    let unreachable = results
        .iter()
        .filter(|(_, _, outcome)| matches!(outcome, ProbeOutcome::Failed { .. }))
        .count();
    if unreachable > 0 {
        tracing::debug!("{} link(s) could not be reached and were not counted", unreachable);
    }

    if broken.is_empty() {
        return Finding::passed(
            TITLE,
            format!("Checked {} link(s); none are broken.", links.len()),
        )
        .premium();
    }

    let urls: Vec<&str> = broken.iter().map(|(url, _)| url.as_str()).collect();
    let detail: Vec<String> = broken
        .iter()
        .map(|(url, diagnostic)| format!("{} -> {}", url, diagnostic))
        .collect();

    Finding::warning(
        TITLE,
        format!(
            "{} of {} checked link(s) are broken: {}",
            broken.len(),
            links.len(),
            urls.join(", ")
        ),
        "Fix or remove links that return errors.",
    )
    .premium()
    .with_detail(detail.join("; "))
}

fn is_broken(outcome: &ProbeOutcome) -> bool {
    matches!(outcome, ProbeOutcome::Response { status } if *status >= 400)
}
