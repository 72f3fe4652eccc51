//! SQLite history backend

use crate::audit::{AuditReport, Finding, Status, Summary, Tier};
use crate::history::schema::initialize_schema;
use crate::history::{AuditRecord, HistoryError, HistoryRepository, HistoryResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed audit history
pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Opens or creates the history database at `path`
    pub fn new(path: &Path) -> HistoryResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> HistoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_findings(&self, audit_id: i64) -> HistoryResult<Vec<Finding>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, status, message, fix, premium, detail
             FROM findings WHERE audit_id = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![audit_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut findings = Vec::new();
        for row in rows {
            let (title, status, message, fix, premium, detail) = row?;
            let status = Status::parse(&status).ok_or_else(|| HistoryError::Corrupt {
                id: audit_id,
                reason: format!("unknown finding status '{}'", status),
            })?;

            findings.push(Finding {
                title,
                status,
                message,
                fix,
                tier: if premium { Tier::Premium } else { Tier::Standard },
                detail,
            });
        }

        Ok(findings)
    }
}

impl HistoryRepository for SqliteHistory {
    fn save(&mut self, identity: &str, report: &AuditReport) -> HistoryResult<AuditRecord> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(HistoryError::EmptyIdentity);
        }

        let created_at = Utc::now();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO audits (identity, url, score, passed, warning, critical, latency_ms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                identity,
                report.url,
                report.score,
                report.summary.passed,
                report.summary.warning,
                report.summary.critical,
                i64::try_from(report.latency_ms).unwrap_or(i64::MAX),
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO findings (audit_id, position, title, status, message, fix, premium, detail)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, finding) in report.findings.iter().enumerate() {
                stmt.execute(params![
                    id,
                    i64::try_from(position).unwrap_or(i64::MAX),
                    finding.title,
                    finding.status.as_str(),
                    finding.message,
                    finding.fix,
                    finding.tier.is_premium(),
                    finding.detail,
                ])?;
            }
        }

        tx.commit()?;

        tracing::debug!("Saved audit {} of {} for {}", id, report.url, identity);

        Ok(AuditRecord {
            id,
            identity: identity.to_string(),
            url: report.url.clone(),
            score: report.score,
            summary: report.summary,
            findings: report.findings.clone(),
            latency_ms: report.latency_ms,
            created_at,
        })
    }

    fn find_history(&self, identity: &str) -> HistoryResult<Vec<AuditRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, score, passed, warning, critical, latency_ms, created_at
             FROM audits WHERE identity = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![identity.trim()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                Summary {
                    passed: row.get(3)?,
                    warning: row.get(4)?,
                    critical: row.get(5)?,
                },
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, url, score, summary, latency_ms, created_at) = row?;

            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| HistoryError::Corrupt {
                    id,
                    reason: format!("invalid timestamp '{}': {}", created_at, e),
                })?
                .with_timezone(&Utc);

            records.push(AuditRecord {
                id,
                identity: identity.trim().to_string(),
                url,
                score,
                summary,
                findings: self.load_findings(id)?,
                latency_ms: u64::try_from(latency_ms).unwrap_or_default(),
                created_at,
            });
        }

        Ok(records)
    }
}
