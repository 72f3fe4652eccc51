//! Score aggregation
//!
//! Scoring is an explicit fold over findings: `Scorecard::default()` is the
//! initial state and `Scorecard::record` is the reducer. Penalties commute, so
//! the order findings arrive in never changes the final score or summary.

use crate::audit::finding::{Finding, Status};
use serde::{Deserialize, Serialize};

/// Score every audit starts from
pub const INITIAL_SCORE: i32 = 100;

/// Counts of findings by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub passed: u32,
    pub warning: u32,
    pub critical: u32,
}

impl Summary {
    /// Total number of findings counted
    pub fn total(&self) -> u32 {
        self.passed + self.warning + self.critical
    }

    fn increment(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Warning => self.warning += 1,
            Status::Critical => self.critical += 1,
        }
    }
}

/// Running state of an audit's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scorecard {
    score: i32,
    summary: Summary,
}

impl Default for Scorecard {
    fn default() -> Self {
        Self {
            score: INITIAL_SCORE,
            summary: Summary::default(),
        }
    }
}

impl Scorecard {
    /// Records one finding
    pub fn record(mut self, finding: &Finding) -> Self {
        self.summary.increment(finding.status);
        self.score -= finding.status.penalty();
        self
    }

    /// Folds a sequence of findings into a fresh scorecard
    pub fn tally<'a, I>(findings: I) -> Self
    where
        I: IntoIterator<Item = &'a Finding>,
    {
        findings
            .into_iter()
            .fold(Self::default(), |card, finding| card.record(finding))
    }

    /// Unclamped running score; may be negative
    pub fn raw_score(&self) -> i32 {
        self.score
    }

    /// Final score, floored at 0
    pub fn final_score(&self) -> u32 {
        self.score.max(0).unsigned_abs()
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }
}
