use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::db::encode_timestamp;
use crate::error::Result;
use crate::memory::types::OwnerKey;

/// Importance above which a memory is listed in a summary's highlights.
const HIGHLIGHT_IMPORTANCE: f64 = 0.7;
const HIGHLIGHT_LIMIT: usize = 5;

/// Per-type aggregate in a [`MemorySummary`].
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    pub memory_type: String,
    pub count: u64,
    pub avg_importance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HighlightedMemory {
    pub id: String,
    pub content: String,
    pub memory_type: String,
    pub importance: f64,
    pub created_at: String,
}

/// The owner's relationship aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipSummary {
    pub interaction_count: u64,
    pub relationship_level: f64,
    pub trust_level: f64,
    pub affection_level: f64,
    pub last_interaction: String,
    pub created_at: String,
}

/// Recent memory activity for one owner.
#[derive(Debug, Clone, Serialize)]
pub struct MemorySummary {
    pub period_days: u32,
    /// Count descending.
    pub by_type: Vec<TypeSummary>,
    /// Up to five memories with importance above 0.7, most important first.
    pub important_memories: Vec<HighlightedMemory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipSummary>,
}

/// Summarize the owner's memories created in the last `days` days.
pub fn memory_summary(
    conn: &Connection,
    owner: &OwnerKey,
    days: u32,
    now: DateTime<Utc>,
) -> Result<MemorySummary> {
    owner.validate()?;
    let since = encode_timestamp(
        now.checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    );

    let by_type = {
        let mut stmt = conn.prepare(
            "SELECT memory_type, COUNT(*), AVG(importance) FROM memories \
             WHERE user_id = ?1 AND character = ?2 AND created_at >= ?3 \
             GROUP BY memory_type ORDER BY COUNT(*) DESC, memory_type",
        )?;
        let rows = stmt
            .query_map(params![owner.user_id, owner.character, since], |row| {
                Ok(TypeSummary {
                    memory_type: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                    avg_importance: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let important_memories = {
        let mut stmt = conn.prepare(
            "SELECT id, content, memory_type, importance, created_at FROM memories \
             WHERE user_id = ?1 AND character = ?2 AND created_at >= ?3 AND importance > ?4 \
             ORDER BY importance DESC, created_at DESC LIMIT ?5",
        )?;
        let rows = stmt
            .query_map(
                params![
                    owner.user_id,
                    owner.character,
                    since,
                    HIGHLIGHT_IMPORTANCE,
                    HIGHLIGHT_LIMIT as i64
                ],
                |row| {
                    Ok(HighlightedMemory {
                        id: row.get(0)?,
                        content: row.get(1)?,
                        memory_type: row.get(2)?,
                        importance: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    Ok(MemorySummary {
        period_days: days,
        by_type,
        important_memories,
        relationship: relationship(conn, owner)?,
    })
}

/// The owner's relationship row, if any memory was ever stored for them.
pub fn relationship(conn: &Connection, owner: &OwnerKey) -> Result<Option<RelationshipSummary>> {
    let row = conn
        .query_row(
            "SELECT interaction_count, relationship_level, trust_level, affection_level, last_interaction, created_at \
             FROM relationships WHERE user_id = ?1 AND character = ?2",
            params![owner.user_id, owner.character],
            |row| {
                Ok(RelationshipSummary {
                    interaction_count: row.get::<_, i64>(0)? as u64,
                    relationship_level: row.get(1)?,
                    trust_level: row.get(2)?,
                    affection_level: row.get(3)?,
                    last_interaction: row.get(4)?,
                    created_at: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Store-wide counts for operators.
#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub total_memories: u64,
    pub by_type: BTreeMap<String, u64>,
    pub owners: u64,
    pub emotional_states: u64,
    pub personality_traits: u64,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<String>,
}

/// Compute store-wide statistics.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn store_stats(conn: &Connection, db_path: Option<&Path>) -> Result<StoreStats> {
    let count = |sql: &str| -> Result<u64> {
        let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n as u64)
    };

    let by_type = {
        let mut stmt =
            conn.prepare("SELECT memory_type, COUNT(*) FROM memories GROUP BY memory_type")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        rows
    };

    let (oldest_memory, newest_memory): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(created_at), MAX(created_at) FROM memories",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StoreStats {
        total_memories: count("SELECT COUNT(*) FROM memories")?,
        by_type,
        owners: count("SELECT COUNT(*) FROM (SELECT DISTINCT user_id, character FROM memories)")?,
        emotional_states: count("SELECT COUNT(*) FROM emotional_states")?,
        personality_traits: count("SELECT COUNT(*) FROM personality_traits")?,
        db_size_bytes,
        oldest_memory,
        newest_memory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::memory::store::{insert_memory, NewMemory};
    use crate::memory::types::MemoryType;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 18, 0, 0).unwrap()
    }

    fn seed(conn: &Connection, content: &str, memory_type: MemoryType, importance: f64, days_old: i64) {
        insert_memory(
            conn,
            &NewMemory {
                owner: OwnerKey::new("u1", "airi"),
                content: content.to_string(),
                memory_type,
                emotion: None,
                importance,
                metadata: None,
            },
            now() - Duration::days(days_old),
        )
        .unwrap();
    }

    #[test]
    fn test_summary_groups_window_by_type() {
        let conn = db::open_memory_database().unwrap();
        seed(&conn, "likes green tea", MemoryType::Preference, 0.8, 1);
        seed(&conn, "likes rainy days", MemoryType::Preference, 0.6, 2);
        seed(&conn, "birthday is in May", MemoryType::Fact, 0.9, 3);
        seed(&conn, "old chat about trains", MemoryType::Conversation, 0.3, 90);

        let summary = memory_summary(&conn, &OwnerKey::new("u1", "airi"), 30, now()).unwrap();

        assert_eq!(summary.by_type.len(), 2);
        assert_eq!(summary.by_type[0].memory_type, "preference");
        assert_eq!(summary.by_type[0].count, 2);
        assert!((summary.by_type[0].avg_importance - 0.7).abs() < 1e-9);

        let highlights: Vec<&str> = summary
            .important_memories
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(highlights, vec!["birthday is in May", "likes green tea"]);

        assert_eq!(summary.relationship.unwrap().interaction_count, 4);
    }

    #[test]
    fn test_summary_for_unknown_owner_is_empty() {
        let conn = db::open_memory_database().unwrap();
        let summary = memory_summary(&conn, &OwnerKey::new("u2", "rei"), 30, now()).unwrap();
        assert!(summary.by_type.is_empty());
        assert!(summary.important_memories.is_empty());
        assert!(summary.relationship.is_none());
    }

    #[test]
    fn test_store_stats_counts() {
        let conn = db::open_memory_database().unwrap();
        seed(&conn, "likes green tea", MemoryType::Preference, 0.8, 1);
        seed(&conn, "birthday is in May", MemoryType::Fact, 0.9, 3);

        let stats = store_stats(&conn, None).unwrap();
        assert_eq!(stats.total_memories, 2);
        assert_eq!(stats.by_type.get("fact"), Some(&1));
        assert_eq!(stats.owners, 1);
        assert_eq!(stats.db_size_bytes, 0);
        assert!(stats.oldest_memory.unwrap() < stats.newest_memory.unwrap());
    }
}
