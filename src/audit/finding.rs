//! Findings: one evaluated SEO signal each

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Warning,
    Critical,
}

impl Status {
    /// Score penalty applied when a finding with this status is recorded
    pub fn penalty(&self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Warning => 5,
            Self::Critical => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "warning" => Some(Self::Warning),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a finding is gated behind a paid plan by the surrounding
/// application. The engine computes every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Premium,
}

impl Tier {
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Premium)
    }
}

/// One evaluated signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Human label, e.g. "Title tag"
    pub title: String,

    pub status: Status,

    /// What was observed
    pub message: String,

    /// Remediation text; empty when the check passed
    pub fix: String,

    pub tier: Tier,

    /// Diagnostics: the failure category of a degraded network check
    /// (timeout, HTTP status, ...) or the elements a check flagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Finding {
    pub fn passed(title: &str, message: impl Into<String>) -> Self {
        Self::new(title, Status::Passed, message, "")
    }

    pub fn warning(title: &str, message: impl Into<String>, fix: &str) -> Self {
        Self::new(title, Status::Warning, message, fix)
    }

    pub fn critical(title: &str, message: impl Into<String>, fix: &str) -> Self {
        Self::new(title, Status::Critical, message, fix)
    }

    fn new(title: &str, status: Status, message: impl Into<String>, fix: &str) -> Self {
        Self {
            title: title.to_string(),
            status,
            message: message.into(),
            fix: fix.to_string(),
            tier: Tier::Standard,
            detail: None,
        }
    }

    /// Marks the finding as premium tier
    pub fn premium(mut self) -> Self {
        self.tier = Tier::Premium;
        self
    }

    /// Attaches diagnostic detail
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
