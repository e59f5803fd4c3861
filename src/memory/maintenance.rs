use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use super::store::write_audit_log;
use super::types::preview;
use crate::config::MaintenanceConfig;
use crate::db::encode_timestamp;
use crate::error::Result;

// ── Result types ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub candidates: Vec<SweepCandidate>,
    pub deleted: usize,
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct SweepCandidate {
    pub id: String,
    pub user_id: String,
    pub character: String,
    #[serde(rename = "type")]
    pub memory_type: String,
    pub importance: f64,
    pub access_count: u32,
    pub content_preview: String,
    pub last_accessed: String,
    pub created_at: String,
}

/// Thresholds for [`retention_sweep`].
#[derive(Debug, Clone, Copy)]
pub struct SweepPolicy {
    pub retention_days: u32,
    pub importance_floor: f64,
    pub access_floor: u32,
}

impl From<&MaintenanceConfig> for SweepPolicy {
    fn from(config: &MaintenanceConfig) -> Self {
        Self {
            retention_days: config.retention_days,
            importance_floor: config.importance_floor,
            access_floor: config.access_floor,
        }
    }
}

// ── Retention ────────────────────────────────────────────────────────────────

/// Find and optionally delete old, unimportant, rarely used memories.
///
/// Candidates: created and last accessed before the cutoff, importance below the
/// floor, and accessed fewer than `access_floor` times. Milestones are kept
/// regardless. In dry_run mode, returns candidates without deleting.
pub fn retention_sweep(
    conn: &mut Connection,
    policy: SweepPolicy,
    dry_run: bool,
    now: DateTime<Utc>,
) -> Result<SweepResult> {
    let cutoff = encode_timestamp(
        now.checked_sub_signed(Duration::days(i64::from(policy.retention_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    );

    let tx = conn.transaction()?;

    let candidates: Vec<SweepCandidate> = {
        let mut stmt = tx.prepare(
            "SELECT id, user_id, character, memory_type, importance, access_count, content, last_accessed, created_at \
             FROM memories \
             WHERE memory_type != 'milestone' \
               AND created_at < ?1 \
               AND last_accessed < ?1 \
               AND importance < ?2 \
               AND access_count < ?3 \
             ORDER BY rowid",
        )?;
        let collected = stmt
            .query_map(
                params![cutoff, policy.importance_floor, policy.access_floor],
                |row| {
                    let content: String = row.get(6)?;
                    Ok(SweepCandidate {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        character: row.get(2)?,
                        memory_type: row.get(3)?,
                        importance: row.get(4)?,
                        access_count: row.get(5)?,
                        content_preview: preview(&content, 80),
                        last_accessed: row.get(7)?,
                        created_at: row.get(8)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        collected
    };

    if dry_run {
        return Ok(SweepResult {
            deleted: 0,
            dry_run: true,
            candidates,
        });
    }

    let mut deleted = 0;
    for candidate in &candidates {
        let details = serde_json::json!({
            "retention_days": policy.retention_days,
            "importance": candidate.importance,
            "access_count": candidate.access_count,
        });
        write_audit_log(&tx, "sweep", &candidate.id, Some(&details), now)?;
        deleted += tx.execute("DELETE FROM memories WHERE id = ?1", params![candidate.id])?;
    }

    tx.commit()?;

    tracing::info!(deleted, retention_days = policy.retention_days, "retention sweep complete");

    Ok(SweepResult {
        deleted,
        dry_run: false,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::memory::store::{get_memory, insert_memory, NewMemory};
    use crate::memory::types::{MemoryType, OwnerKey};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()
    }

    fn policy() -> SweepPolicy {
        SweepPolicy::from(&MaintenanceConfig::default())
    }

    fn seed(conn: &Connection, memory_type: MemoryType, importance: f64, days_old: i64) -> String {
        insert_memory(
            conn,
            &NewMemory {
                owner: OwnerKey::new("u1", "airi"),
                content: "said something in passing".to_string(),
                memory_type,
                emotion: None,
                importance,
                metadata: None,
            },
            now() - Duration::days(days_old),
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_deletes_only_stale_unimportant() {
        let mut conn = db::open_memory_database().unwrap();
        let stale = seed(&conn, MemoryType::Conversation, 0.1, 400);
        let recent = seed(&conn, MemoryType::Conversation, 0.1, 10);
        let important = seed(&conn, MemoryType::Conversation, 0.5, 400);
        let milestone = seed(&conn, MemoryType::Milestone, 0.1, 400);

        let result = retention_sweep(&mut conn, policy(), false, now()).unwrap();
        assert_eq!(result.deleted, 1);
        assert_eq!(result.candidates[0].id, stale);

        assert!(get_memory(&conn, &stale).unwrap().is_none());
        for kept in [&recent, &important, &milestone] {
            assert!(get_memory(&conn, kept).unwrap().is_some());
        }

        let sweeps: i64 = conn
            .query_row("SELECT COUNT(*) FROM memory_log WHERE operation = 'sweep'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(sweeps, 1);
    }

    #[test]
    fn test_frequently_accessed_memories_survive() {
        let mut conn = db::open_memory_database().unwrap();
        let id = seed(&conn, MemoryType::Fact, 0.1, 400);
        conn.execute("UPDATE memories SET access_count = 5 WHERE id = ?1", params![id])
            .unwrap();

        let result = retention_sweep(&mut conn, policy(), false, now()).unwrap();
        assert_eq!(result.deleted, 0);
    }

    #[test]
    fn test_dry_run_reports_without_deleting() {
        let mut conn = db::open_memory_database().unwrap();
        let id = seed(&conn, MemoryType::Conversation, 0.1, 400);

        let result = retention_sweep(&mut conn, policy(), true, now()).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.deleted, 0);
        assert!(get_memory(&conn, &id).unwrap().is_some());
    }
}
