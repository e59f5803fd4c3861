//! Write path: validation, importance scoring, storage, relationship bump, and audit logging.
//!
//! [`store_memory`] is the public entry point and owns its transaction;
//! `store_memory_in` runs the same path on a transaction the caller holds.
//! [`insert_memory`] is the shared row writer; it runs on whatever transaction the
//! caller holds, which is how journal entries land inside a trait adjustment.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{decode_timestamp, encode_timestamp};
use crate::error::{AnimaError, Result};
use crate::memory::importance::{self, ImportanceSignals};
use crate::memory::keywords::KeywordExtractor;
use crate::memory::types::{validate_bounds, validate_content, Memory, MemoryType, OwnerKey};

/// Emotional weight assumed for scoring when a memory carries an emotion tag.
const TAGGED_EMOTIONAL_WEIGHT: f64 = 0.5;

/// Inbound request for [`store_memory`].
#[derive(Debug, Clone)]
pub struct StoreMemoryRequest {
    pub owner: OwnerKey,
    pub content: String,
    pub memory_type: MemoryType,
    pub emotion: Option<String>,
    /// Explicit importance. When absent the memory is scored automatically.
    pub importance: Option<f64>,
    /// Must be a JSON object when present.
    pub metadata: Option<serde_json::Value>,
    pub direct_interaction: bool,
}

/// Result returned from a store operation.
#[derive(Debug, Clone, Serialize)]
pub struct StoreMemoryResult {
    pub memory_id: String,
    pub importance_used: f64,
    /// Keywords extracted from the content (empty when importance was supplied).
    pub keywords: Vec<String>,
}

/// A fully resolved row ready for [`insert_memory`].
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub owner: OwnerKey,
    pub content: String,
    pub memory_type: MemoryType,
    pub emotion: Option<String>,
    pub importance: f64,
    pub metadata: Option<serde_json::Value>,
}

/// Full write path: validate, score if needed, insert, bump relationship, audit.
pub fn store_memory(
    conn: &mut Connection,
    extractor: &dyn KeywordExtractor,
    req: &StoreMemoryRequest,
    max_keywords: usize,
    now: DateTime<Utc>,
) -> Result<StoreMemoryResult> {
    let tx = conn.transaction()?;
    let result = store_memory_in(&tx, extractor, req, max_keywords, now)?;
    tx.commit()?;
    Ok(result)
}

/// [`store_memory`] on the caller's transaction.
pub(crate) fn store_memory_in(
    conn: &Connection,
    extractor: &dyn KeywordExtractor,
    req: &StoreMemoryRequest,
    max_keywords: usize,
    now: DateTime<Utc>,
) -> Result<StoreMemoryResult> {
    req.owner.validate()?;
    let content = validate_content(&req.content, req.memory_type)?;
    let emotion = normalize_emotion_tag(req.emotion.as_deref());

    let mut metadata = match &req.metadata {
        None => None,
        Some(value) if value.is_object() => Some(value.clone()),
        Some(_) => return Err(AnimaError::validation("metadata must be a JSON object")),
    };

    let (importance, keywords) = match req.importance {
        Some(value) => {
            validate_importance(value)?;
            (value, Vec::new())
        }
        None => {
            let keywords = extractor.extract(content, max_keywords);
            let signals = ImportanceSignals {
                emotional_weight: if emotion.is_some() {
                    TAGGED_EMOTIONAL_WEIGHT
                } else {
                    0.0
                },
                keyword_count: keywords.len(),
                direct_interaction: req.direct_interaction,
            };
            let scored = importance::score(content, req.memory_type, signals);

            let map = metadata.get_or_insert_with(|| serde_json::json!({}));
            if let Some(object) = map.as_object_mut() {
                object.insert("auto_keywords".to_string(), serde_json::json!(keywords));
            }
            (scored, keywords)
        }
    };

    let new = NewMemory {
        owner: req.owner.clone(),
        content: content.to_string(),
        memory_type: req.memory_type,
        emotion,
        importance,
        metadata,
    };

    let memory_id = insert_memory(conn, &new, now)?;

    tracing::info!(
        owner = %req.owner,
        memory_id = %memory_id,
        memory_type = %req.memory_type,
        importance,
        "memory stored"
    );

    Ok(StoreMemoryResult {
        memory_id,
        importance_used: importance,
        keywords,
    })
}

/// Insert a memory row, bump the owner's relationship, and write the `create` audit row.
///
/// Runs on the caller's transaction. Only length bounds are checked here; the
/// spam heuristic belongs to [`store_memory`], so system-written rows such as
/// journal entries are never rejected by it. Returns the new memory id.
pub fn insert_memory(conn: &Connection, new: &NewMemory, now: DateTime<Utc>) -> Result<String> {
    new.owner.validate()?;
    let content = validate_bounds(&new.content, new.memory_type)?;
    validate_importance(new.importance)?;

    let id = uuid::Uuid::now_v7().to_string();
    let at = encode_timestamp(now);
    let metadata_json = new.metadata.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        "INSERT INTO memories \
         (id, user_id, character, content, memory_type, emotion, importance, created_at, last_accessed, access_count, metadata) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, 0, ?9)",
        params![
            id,
            new.owner.user_id,
            new.owner.character,
            content,
            new.memory_type.as_str(),
            new.emotion,
            new.importance,
            at,
            metadata_json,
        ],
    )?;

    touch_relationship(conn, &new.owner, now)?;
    write_audit_log(
        conn,
        "create",
        &id,
        Some(&serde_json::json!({"memory_type": new.memory_type.as_str()})),
        now,
    )?;

    Ok(id)
}

/// Create the owner's relationship row if needed and count one more interaction.
pub(crate) fn touch_relationship(conn: &Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<()> {
    let at = encode_timestamp(now);
    conn.execute(
        "INSERT INTO relationships (user_id, character, interaction_count, last_interaction, created_at) \
         VALUES (?1, ?2, 1, ?3, ?3) \
         ON CONFLICT(user_id, character) DO UPDATE SET \
         interaction_count = interaction_count + 1, last_interaction = excluded.last_interaction",
        params![owner.user_id, owner.character, at],
    )?;
    Ok(())
}

/// Write an entry to the memory_log audit table.
pub(crate) fn write_audit_log(
    conn: &Connection,
    operation: &str,
    memory_id: &str,
    details: Option<&serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<()> {
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO memory_log (operation, memory_id, details, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operation, memory_id, details_json, encode_timestamp(now)],
    )?;
    Ok(())
}

fn validate_importance(value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AnimaError::Validation(format!(
            "importance must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

fn normalize_emotion_tag(tag: Option<&str>) -> Option<String> {
    tag.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

/// Column list matching [`MemoryRow::from_row`].
pub(crate) const MEMORY_COLUMNS: &str = "id, user_id, character, content, memory_type, emotion, \
     importance, created_at, last_accessed, access_count, metadata";

/// A `memories` row as SQLite hands it back, before domain decoding.
pub(crate) struct MemoryRow {
    id: String,
    user_id: String,
    character: String,
    content: String,
    memory_type: String,
    emotion: Option<String>,
    importance: f64,
    created_at: String,
    last_accessed: String,
    access_count: i64,
    metadata: Option<String>,
}

impl MemoryRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            character: row.get(2)?,
            content: row.get(3)?,
            memory_type: row.get(4)?,
            emotion: row.get(5)?,
            importance: row.get(6)?,
            created_at: row.get(7)?,
            last_accessed: row.get(8)?,
            access_count: row.get(9)?,
            metadata: row.get(10)?,
        })
    }

    pub(crate) fn into_memory(self) -> Result<Memory> {
        let memory_type = self
            .memory_type
            .parse::<MemoryType>()
            .map_err(AnimaError::Corrupt)?;
        let access_count = u32::try_from(self.access_count)
            .map_err(|_| AnimaError::Corrupt(format!("bad access_count {}", self.access_count)))?;
        let metadata = self
            .metadata
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Memory {
            id: self.id,
            owner: OwnerKey::new(self.user_id, self.character),
            content: self.content,
            memory_type,
            emotion: self.emotion,
            importance: self.importance,
            created_at: decode_timestamp(&self.created_at)?,
            last_accessed: decode_timestamp(&self.last_accessed)?,
            access_count,
            metadata,
        })
    }
}

/// Fetch one memory by id.
pub fn get_memory(conn: &Connection, id: &str) -> Result<Option<Memory>> {
    let row = conn
        .query_row(
            &format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"),
            params![id],
            MemoryRow::from_row,
        )
        .optional()?;
    row.map(MemoryRow::into_memory).transpose()
}

/// Every memory in the store, oldest first.
pub fn all_memories(conn: &Connection) -> Result<Vec<Memory>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMORY_COLUMNS} FROM memories ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map([], MemoryRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(MemoryRow::into_memory).collect()
}

/// One `memory_log` row.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub operation: String,
    pub details: Option<serde_json::Value>,
    pub created_at: String,
}

/// The audit trail of one memory, oldest first.
pub fn audit_trail(conn: &Connection, memory_id: &str) -> Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT operation, details, created_at FROM memory_log WHERE memory_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![memory_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(operation, details, created_at)| {
            Ok(AuditEntry {
                operation,
                details: details.as_deref().map(serde_json::from_str).transpose()?,
                created_at,
            })
        })
        .collect()
}
