//! SQLite alert log.
//!
//! RULE: Only store.rs talks to the database.
//! This is the persistence side of alert delivery; engine state itself
//! is never written here.

use crate::{
    error::EngineResult,
    event::Notification,
};
use rusqlite::{params, Connection};

pub struct AlertStore {
    conn: Connection,
}

/// One persisted notification.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertLogEntry {
    pub id:           i64,
    pub run_id:       String,
    pub seq:          u64,
    pub kind:         String,
    pub user_id:      String,
    pub amount:       f64,
    pub risk_score:   Option<f64>,
    pub notification: Notification,
    pub recorded_at:  String,
}

impl AlertStore {
    /// Open (or create) the alert database at `path`.
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_alert_log.sql"))?;
        Ok(())
    }

    pub fn append_notification(
        &self,
        run_id: &str,
        seq: u64,
        notification: &Notification,
    ) -> EngineResult<()> {
        let payload = serde_json::to_string(notification)?;
        self.conn.execute(
            "INSERT INTO alert_log (run_id, seq, kind, user_id, amount, risk_score, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                run_id,
                seq as i64,
                notification.kind(),
                notification.user_id(),
                notification.amount(),
                notification.risk_score(),
                payload,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn notifications_for_run(&self, run_id: &str) -> EngineResult<Vec<AlertLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, seq, kind, user_id, amount, risk_score, payload, recorded_at
             FROM alert_log WHERE run_id = ?1
             ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)? as u64,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, Option<f64>>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| -> EngineResult<AlertLogEntry> {
                let (id, run_id, seq, kind, user_id, amount, risk_score, payload, recorded_at) =
                    row;
                Ok(AlertLogEntry {
                    id,
                    run_id,
                    seq,
                    kind,
                    user_id,
                    amount,
                    risk_score,
                    notification: serde_json::from_str(&payload)?,
                    recorded_at,
                })
            })
            .collect()
    }

    pub fn count_by_kind(&self, run_id: &str, kind: &str) -> EngineResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM alert_log WHERE run_id = ?1 AND kind = ?2",
            params![run_id, kind],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
