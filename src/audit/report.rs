//! Audit results: the full report or a fatal failure

use crate::audit::finding::{Finding, Tier};
use crate::audit::score::{Scorecard, Summary};
use crate::AuditError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the audited page cannot be fetched
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the website or the request was blocked.";

/// Scored audit of a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Normalized target URL
    pub url: String,

    /// Final score, 0-100
    pub score: u32,

    pub summary: Summary,

    /// Findings in emission order
    pub findings: Vec<Finding>,

    /// Measured latency of the primary fetch
    pub latency_ms: u64,
}

impl AuditReport {
    /// Folds findings into a report
    ///
    /// Findings keep the order given; score and summary come from the fold.
    pub fn assemble(url: impl Into<String>, findings: Vec<Finding>, latency_ms: u64) -> Self {
        let card = Scorecard::tally(&findings);

        Self {
            url: url.into(),
            score: card.final_score(),
            summary: card.summary(),
            findings,
            latency_ms,
        }
    }

    /// Findings of a given tier, in order
    pub fn findings_in(&self, tier: Tier) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |finding| finding.tier == tier)
    }

    /// Looks up a finding by title
    pub fn finding(&self, title: &str) -> Option<&Finding> {
        self.findings.iter().find(|finding| finding.title == title)
    }
}

/// Fatal audit failure: the audited page could not be fetched
///
/// Serializes as `{"error": true, "message": ..., "detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AuditFailure {
    /// Always true
    pub error: bool,

    /// Short message suitable for direct display
    pub message: String,

    /// Raw diagnostic detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditFailure {
    pub fn new(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            detail,
        }
    }

    /// The failure returned when the primary fetch fails
    pub fn unreachable(cause: &AuditError) -> Self {
        Self::new(UNREACHABLE_MESSAGE, Some(cause.to_string()))
    }
}
