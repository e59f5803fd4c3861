//! Memory deletion and importance correction.
//!
//! Both operations look the memory up first so an unknown id surfaces as
//! [`AnimaError::NotFound`] instead of a silent no-op, and both leave an audit row.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use super::store::write_audit_log;
use crate::error::{AnimaError, Result};

/// Result returned from [`delete_memory`].
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub id: String,
    #[serde(rename = "type")]
    pub memory_type: String,
}

/// Result returned from [`update_importance`].
#[derive(Debug, Serialize)]
pub struct ImportanceUpdate {
    pub id: String,
    pub old_importance: f64,
    pub new_importance: f64,
}

/// Permanently remove a memory.
pub fn delete_memory(
    conn: &mut Connection,
    memory_id: &str,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DeleteResult> {
    let tx = conn.transaction()?;

    let memory_type: String = tx
        .query_row(
            "SELECT memory_type FROM memories WHERE id = ?1",
            params![memory_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| AnimaError::NotFound(format!("memory {memory_id}")))?;

    // Audit first; memory_log references the id as plain text
    let details = serde_json::json!({ "reason": reason, "memory_type": memory_type });
    write_audit_log(&tx, "delete", memory_id, Some(&details), now)?;
    tx.execute("DELETE FROM memories WHERE id = ?1", params![memory_id])?;

    tx.commit()?;

    tracing::info!(memory_id, memory_type = %memory_type, "memory deleted");

    Ok(DeleteResult {
        id: memory_id.to_string(),
        memory_type,
    })
}

/// Overwrite a memory's importance.
pub fn update_importance(
    conn: &mut Connection,
    memory_id: &str,
    importance: f64,
    now: DateTime<Utc>,
) -> Result<ImportanceUpdate> {
    if !importance.is_finite() || !(0.0..=1.0).contains(&importance) {
        return Err(AnimaError::Validation(format!(
            "importance must be between 0.0 and 1.0, got {importance}"
        )));
    }

    let tx = conn.transaction()?;

    let old_importance: f64 = tx
        .query_row(
            "SELECT importance FROM memories WHERE id = ?1",
            params![memory_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| AnimaError::NotFound(format!("memory {memory_id}")))?;

    tx.execute(
        "UPDATE memories SET importance = ?1 WHERE id = ?2",
        params![importance, memory_id],
    )?;
    let details = serde_json::json!({ "old_importance": old_importance, "new_importance": importance });
    write_audit_log(&tx, "update", memory_id, Some(&details), now)?;

    tx.commit()?;

    tracing::info!(memory_id, old_importance, new_importance = importance, "importance updated");

    Ok(ImportanceUpdate {
        id: memory_id.to_string(),
        old_importance,
        new_importance: importance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::memory::store::{get_memory, insert_memory, NewMemory};
    use crate::memory::types::{MemoryType, OwnerKey};

    fn seed(conn: &Connection) -> String {
        insert_memory(
            conn,
            &NewMemory {
                owner: OwnerKey::new("u1", "airi"),
                content: "likes green tea".to_string(),
                memory_type: MemoryType::Preference,
                emotion: None,
                importance: 0.5,
                metadata: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn log_count(conn: &Connection, operation: &str, id: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM memory_log WHERE operation = ?1 AND memory_id = ?2",
            params![operation, id],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_delete_removes_row_and_audits() {
        let mut conn = db::open_memory_database().unwrap();
        let id = seed(&conn);

        let result = delete_memory(&mut conn, &id, Some("user asked"), Utc::now()).unwrap();
        assert_eq!(result.memory_type, "preference");
        assert!(get_memory(&conn, &id).unwrap().is_none());
        assert_eq!(log_count(&conn, "delete", &id), 1);
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let mut conn = db::open_memory_database().unwrap();
        let err = delete_memory(&mut conn, "missing", None, Utc::now()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_importance() {
        let mut conn = db::open_memory_database().unwrap();
        let id = seed(&conn);

        let update = update_importance(&mut conn, &id, 0.9, Utc::now()).unwrap();
        assert_eq!(update.old_importance, 0.5);
        assert_eq!(get_memory(&conn, &id).unwrap().unwrap().importance, 0.9);
        assert_eq!(log_count(&conn, "update", &id), 1);
    }

    #[test]
    fn test_update_importance_rejects_bad_input() {
        let mut conn = db::open_memory_database().unwrap();
        let id = seed(&conn);

        assert!(update_importance(&mut conn, &id, -0.1, Utc::now()).unwrap_err().is_validation());
        assert!(update_importance(&mut conn, &id, f64::NAN, Utc::now()).unwrap_err().is_validation());
        assert!(update_importance(&mut conn, "missing", 0.4, Utc::now()).unwrap_err().is_not_found());
        assert_eq!(get_memory(&conn, &id).unwrap().unwrap().importance, 0.5);
    }
}
