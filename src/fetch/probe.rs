//! Auxiliary existence probes
//!
//! Probes never fail the audit. Every outcome, including transport errors,
//! is returned as a `ProbeOutcome` so the caller can turn it into a finding.

use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Category of a failed probe, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The probe exceeded its timeout
    Timeout,
    /// DNS, TCP or TLS failure
    Connect,
    /// Redirect loop or too many redirects
    Redirect,
    /// Any other request error
    Request,
}

impl FailureKind {
    /// Classifies a transport error
    pub fn of(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else if error.is_redirect() {
            Self::Redirect
        } else {
            Self::Request
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connection error",
            Self::Redirect => "redirect error",
            Self::Request => "request error",
        };
        f.write_str(label)
    }
}

/// Result of a probe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response arrived with this status code
    Response { status: u16 },

    /// No response arrived
    Failed { kind: FailureKind, error: String },
}

impl ProbeOutcome {
    /// True for a 2xx response
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { status } if (200..300).contains(status))
    }

    /// Short diagnostic label, e.g. "HTTP 404" or "timeout: ..."
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Response { status } => format!("HTTP {}", status),
            Self::Failed { kind, error } => format!("{}: {}", kind, error),
        }
    }
}

/// Issues a GET request and reports how it went
///
/// The body is never read; only the status line matters.
pub async fn probe(client: &Client, url: &str, timeout: Duration) -> ProbeOutcome {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) => ProbeOutcome::Response {
            status: response.status().as_u16(),
        },
        Err(e) => failed(url, e),
    }
}

/// Like `probe`, but also returns the body of a 2xx response
///
/// A body that cannot be read is reported as `None` without changing the
/// outcome; the file still exists.
pub async fn probe_text(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> (ProbeOutcome, Option<String>) {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) => {
            let status = response.status();
            let body = if status.is_success() {
                response.text().await.ok()
            } else {
                None
            };
            (
                ProbeOutcome::Response {
                    status: status.as_u16(),
                },
                body,
            )
        }
        Err(e) => (failed(url, e), None),
    }
}

fn failed(url: &str, error: reqwest::Error) -> ProbeOutcome {
    let kind = FailureKind::of(&error);
    tracing::debug!("Probe of {} failed ({}): {}", url, kind, error);
    ProbeOutcome::Failed {
        kind,
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::fetch::build_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_outcome_success_range() {
        assert!(ProbeOutcome::Response { status: 200 }.is_success());
        assert!(ProbeOutcome::Response { status: 204 }.is_success());
        assert!(!ProbeOutcome::Response { status: 301 }.is_success());
        assert!(!ProbeOutcome::Response { status: 404 }.is_success());
        assert!(!ProbeOutcome::Failed {
            kind: FailureKind::Timeout,
            error: "deadline".to_string()
        }
        .is_success());
    }

    #[test]
    fn test_diagnostic_keeps_category() {
        assert_eq!(
            ProbeOutcome::Response { status: 404 }.diagnostic(),
            "HTTP 404"
        );
        let failed = ProbeOutcome::Failed {
            kind: FailureKind::Connect,
            error: "refused".to_string(),
        };
        assert_eq!(failed.diagnostic(), "connection error: refused");
    }

    #[tokio::test]
    async fn test_probe_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&FetchConfig::default()).unwrap();
        let outcome = probe(
            &client,
            &format!("{}/missing", server.uri()),
            Duration::from_secs(3),
        )
        .await;

        assert_eq!(outcome, ProbeOutcome::Response { status: 404 });
    }

    #[tokio::test]
    async fn test_probe_text_reads_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *"))
            .mount(&server)
            .await;

        let client = build_http_client(&FetchConfig::default()).unwrap();
        let (outcome, body) = probe_text(
            &client,
            &format!("{}/robots.txt", server.uri()),
            Duration::from_secs(3),
        )
        .await;

        assert!(outcome.is_success());
        assert_eq!(body.as_deref(), Some("User-agent: *"));
    }

    #[tokio::test]
    async fn test_probe_timeout_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
            .mount(&server)
            .await;

        let client = build_http_client(&FetchConfig::default()).unwrap();
        let outcome = probe(&client, &server.uri(), Duration::from_millis(200)).await;

        assert!(matches!(
            outcome,
            ProbeOutcome::Failed {
                kind: FailureKind::Timeout,
                ..
            }
        ));
    }
}
