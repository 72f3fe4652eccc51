//! HTTP client construction and the primary page fetch
//!
//! This module handles:
//! - Building the shared HTTP client with a browser-like identity
//! - Fetching the audited page with a bounded timeout
//! - Measuring wall-clock latency from request start to body completion
//! - Classifying transport failures

use crate::config::FetchConfig;
use crate::{AuditError, ConfigError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
    /// Milliseconds from request start until the body was read
    pub latency_ms: u64,
}

/// Builds the HTTP client shared by every request of an audit
///
/// The client carries the configured User-Agent and Accept-Language headers
/// and follows up to `max_redirects` redirects. Timeouts are applied per
/// request since the primary fetch and the probes use different bounds.
///
/// # Example
///
/// ```
/// use seo_audit::config::FetchConfig;
/// use seo_audit::fetch::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, AuditError> {
    let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
        ConfigError::Validation(format!(
            "accept_language is not a valid header value: {}",
            e
        ))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, accept_language);

    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(config.page_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches the audited page
///
/// # Failure Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout (connect, headers or body) | `AuditError::Timeout` |
/// | Connection refused / DNS / TLS | `AuditError::Connect` |
/// | Non-2xx status | `AuditError::Status` |
/// | Body could not be read | `AuditError::Body` |
/// | Anything else | `AuditError::Http` |
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, AuditError> {
    let started = Instant::now();

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuditError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            AuditError::Timeout {
                url: url.to_string(),
            }
        } else {
            AuditError::Body {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::debug!(
        "Fetched {} ({} bytes, status {}, {}ms)",
        final_url,
        body.len(),
        status.as_u16(),
        latency_ms
    );

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
        latency_ms,
    })
}

/// Maps a transport error onto the audit error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> AuditError {
    let url = url.to_string();
    if error.is_timeout() {
        AuditError::Timeout { url }
    } else if error.is_connect() {
        AuditError::Connect { url, source: error }
    } else {
        AuditError::Http { url, source: error }
    }
}
