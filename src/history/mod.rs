//! Audit history
//!
//! The engine never persists anything itself. Callers that want a history
//! hand finished reports to a `HistoryRepository`, keyed by the identity of
//! whoever requested the audit.

mod schema;
mod sqlite;

pub use sqlite::SqliteHistory;

use crate::audit::{AuditReport, Finding, Summary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by a history backend
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("Identity must not be empty")]
    EmptyIdentity,
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// A stored audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub id: i64,

    /// Who requested the audit
    pub identity: String,

    pub url: String,
    pub score: u32,
    pub summary: Summary,
    pub findings: Vec<Finding>,
    pub latency_ms: u64,

    /// When the audit was stored
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Rebuilds the report this record was saved from
    pub fn to_report(&self) -> AuditReport {
        AuditReport {
            url: self.url.clone(),
            score: self.score,
            summary: self.summary,
            findings: self.findings.clone(),
            latency_ms: self.latency_ms,
        }
    }
}

/// Storage backend for finished audits
pub trait HistoryRepository {
    /// Stores a report for `identity` and returns the stored record
    fn save(&mut self, identity: &str, report: &AuditReport) -> HistoryResult<AuditRecord>;

    /// Every audit stored for `identity`, newest first
    fn find_history(&self, identity: &str) -> HistoryResult<Vec<AuditRecord>>;
}
