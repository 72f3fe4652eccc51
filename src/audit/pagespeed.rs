//! External performance probe (PageSpeed Insights)
//!
//! Only runs when an API key is configured. A successful probe yields three
//! findings: the overall performance score, First Contentful Paint and
//! Largest Contentful Paint. Any failure collapses into a single warning.

use crate::audit::finding::{Finding, Status};
use crate::config::PerformanceConfig;
use crate::fetch::FailureKind;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Minimum score for a passed metric
pub const PASS_THRESHOLD: f64 = 0.90;

/// Minimum score for a warning; anything lower is critical
pub const WARN_THRESHOLD: f64 = 0.50;

const FCP_AUDIT: &str = "first-contentful-paint";
const LCP_AUDIT: &str = "largest-contentful-paint";

#[derive(Debug, Deserialize)]
struct PageSpeedResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: Categories,
    #[serde(default)]
    audits: HashMap<String, LighthouseAudit>,
}

#[derive(Debug, Default, Deserialize)]
struct Categories {
    performance: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LighthouseAudit {
    score: Option<f64>,
    #[serde(rename = "displayValue")]
    display_value: Option<String>,
}

/// A single Lighthouse metric
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Score on a 0-1 scale
    pub score: f64,
    /// Human-readable value, e.g. "1.8 s"
    pub display_value: String,
}

/// Scores extracted from a PageSpeed Insights response
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Overall category score on a 0-1 scale
    pub performance: f64,
    pub first_contentful_paint: Metric,
    pub largest_contentful_paint: Metric,
}

impl PerformanceMetrics {
    /// Extracts the metrics from a raw PageSpeed Insights JSON body
    pub fn from_json(body: &str) -> Result<Self, String> {
        let response: PageSpeedResponse =
            serde_json::from_str(body).map_err(|e| format!("invalid response: {}", e))?;
        Self::from_response(response)
    }

    fn from_response(response: PageSpeedResponse) -> Result<Self, String> {
        let result = response
            .lighthouse_result
            .ok_or_else(|| "response has no lighthouseResult".to_string())?;

        let performance = result
            .categories
            .performance
            .and_then(|category| category.score)
            .ok_or_else(|| "response has no performance score".to_string())?;

        Ok(Self {
            performance: normalize_category_score(performance),
            first_contentful_paint: metric(&result.audits, FCP_AUDIT)?,
            largest_contentful_paint: metric(&result.audits, LCP_AUDIT)?,
        })
    }
}

fn metric(audits: &HashMap<String, LighthouseAudit>, id: &str) -> Result<Metric, String> {
    let audit = audits
        .get(id)
        .ok_or_else(|| format!("response has no {} audit", id))?;
    let score = audit
        .score
        .ok_or_else(|| format!("{} audit has no score", id))?;

    Ok(Metric {
        score,
        display_value: audit
            .display_value
            .clone()
            .unwrap_or_else(|| "n/a".to_string()),
    })
}

/// Brings the overall category score from 0-100 onto the 0-1 scale the
/// thresholds use. Metric scores already arrive on 0-1.
pub fn normalize_category_score(score: f64) -> f64 {
    score / 100.0
}

/// Buckets a 0-1 score into a verdict
pub fn bucket(score: f64) -> Status {
    if score >= PASS_THRESHOLD {
        Status::Passed
    } else if score >= WARN_THRESHOLD {
        Status::Warning
    } else {
        Status::Critical
    }
}

/// Runs the probe if it is configured
///
/// Returns no findings when no API key is set, three findings on success and
/// one warning on failure.
pub async fn check_performance(
    client: &Client,
    config: &PerformanceConfig,
    target: &str,
) -> Vec<Finding> {
    let Some(api_key) = config.api_key() else {
        tracing::debug!("No PageSpeed API key configured, skipping performance probe");
        return Vec::new();
    };

    match fetch_metrics(client, config, api_key, target).await {
        Ok(metrics) => metrics_findings(&metrics, &config.strategy),
        Err(detail) => {
            tracing::warn!("Performance probe for {} failed: {}", target, detail);
            vec![unavailable(detail)]
        }
    }
}

async fn fetch_metrics(
    client: &Client,
    config: &PerformanceConfig,
    api_key: &str,
    target: &str,
) -> Result<PerformanceMetrics, String> {
    let response = client
        .get(&config.endpoint)
        .query(&[
            ("url", target),
            ("category", "performance"),
            ("strategy", config.strategy.as_str()),
            ("key", api_key),
        ])
        .timeout(Duration::from_secs(config.timeout_secs))
        .send()
        .await
        .map_err(|e| format!("{}: {}", FailureKind::of(&e), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("{}: {}", FailureKind::of(&e), e))?;

    PerformanceMetrics::from_json(&body)
}

/// Converts metrics into the three performance findings
pub fn metrics_findings(metrics: &PerformanceMetrics, strategy: &str) -> Vec<Finding> {
    let overall = metric_finding(
        &format!("Performance score ({})", strategy),
        metrics.performance,
        format!(
            "Lighthouse performance score is {}/100.",
            (metrics.performance * 100.0).round()
        ),
        "Reduce render-blocking resources, unused JavaScript and image weight.",
    );

    let fcp = &metrics.first_contentful_paint;
    let first_paint = metric_finding(
        "First Contentful Paint",
        fcp.score,
        format!(
            "First Contentful Paint is {} (score {:.2}).",
            fcp.display_value, fcp.score
        ),
        "Inline critical CSS and defer non-critical scripts.",
    );

    let lcp = &metrics.largest_contentful_paint;
    let largest_paint = metric_finding(
        "Largest Contentful Paint",
        lcp.score,
        format!(
            "Largest Contentful Paint is {} (score {:.2}).",
            lcp.display_value, lcp.score
        ),
        "Optimize the largest above-the-fold image or text block.",
    );

    vec![overall, first_paint, largest_paint]
}

fn metric_finding(title: &str, score: f64, message: String, fix: &str) -> Finding {
    let finding = match bucket(score) {
        Status::Passed => Finding::passed(title, message),
        Status::Warning => Finding::warning(title, message, fix),
        Status::Critical => Finding::critical(title, message, fix),
    };
    finding.premium()
}

fn unavailable(detail: String) -> Finding {
    Finding::warning(
        "Performance (PageSpeed)",
        "Performance data unavailable.",
        "Retry later or check the PageSpeed Insights API key.",
    )
    .premium()
    .with_detail(detail)
}
