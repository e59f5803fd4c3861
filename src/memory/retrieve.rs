//! Read path: filter, rank, truncate, optionally rerank by query, then bump access.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::db::encode_timestamp;
use crate::error::{AnimaError, Result};
use crate::memory::keywords::KeywordExtractor;
use crate::memory::rank::{rank, rerank_by_query};
use crate::memory::store::{write_audit_log, MemoryRow, MEMORY_COLUMNS};
use crate::memory::types::{Memory, MemoryType, OwnerKey};

/// Default number of memories returned by a retrieval.
pub const DEFAULT_LIMIT: usize = 10;

/// Upstream filters applied in SQL before ranking.
#[derive(Debug, Clone)]
pub struct MemoryFilter<'a> {
    pub owner: &'a OwnerKey,
    pub min_importance: f64,
    pub memory_type: Option<MemoryType>,
}

/// Inbound request for [`retrieve`].
#[derive(Debug, Clone)]
pub struct RetrieveRequest {
    pub owner: OwnerKey,
    /// Reorders the ranked result by relevance. Never filters it.
    pub query: Option<String>,
    pub memory_type: Option<MemoryType>,
    pub limit: usize,
    pub min_importance: f64,
}

impl RetrieveRequest {
    pub fn new(owner: OwnerKey) -> Self {
        Self {
            owner,
            query: None,
            memory_type: None,
            limit: DEFAULT_LIMIT,
            min_importance: 0.0,
        }
    }
}

/// Retrieve an owner's memories in rank order and record the access.
///
/// Returned records carry the bumped `access_count` and `last_accessed`.
pub fn retrieve(
    conn: &mut Connection,
    extractor: &dyn KeywordExtractor,
    req: &RetrieveRequest,
    now: DateTime<Utc>,
) -> Result<Vec<Memory>> {
    let tx = conn.transaction()?;
    let memories = retrieve_in(&tx, extractor, req, now)?;
    tx.commit()?;
    Ok(memories)
}

/// [`retrieve`] on the caller's transaction.
pub(crate) fn retrieve_in(
    conn: &Connection,
    extractor: &dyn KeywordExtractor,
    req: &RetrieveRequest,
    now: DateTime<Utc>,
) -> Result<Vec<Memory>> {
    req.owner.validate()?;
    if req.limit == 0 {
        return Err(AnimaError::validation("limit must be at least 1"));
    }
    if !req.min_importance.is_finite() || !(0.0..=1.0).contains(&req.min_importance) {
        return Err(AnimaError::Validation(format!(
            "min_importance must be between 0.0 and 1.0, got {}",
            req.min_importance
        )));
    }

    let candidates = query_memories(
        conn,
        &MemoryFilter {
            owner: &req.owner,
            min_importance: req.min_importance,
            memory_type: req.memory_type,
        },
    )?;
    let candidate_count = candidates.len();

    let mut ranked = rank(candidates, now);
    ranked.truncate(req.limit);

    if let Some(query) = req.query.as_deref().filter(|q| !q.trim().is_empty()) {
        ranked = rerank_by_query(ranked, query, extractor);
    }

    let mut memories = Vec::with_capacity(ranked.len());
    for r in ranked {
        let mut memory = r.memory;
        bump_access(conn, &memory.id, now)?;
        memory.access_count += 1;
        memory.last_accessed = now;
        memories.push(memory);
    }

    tracing::debug!(
        owner = %req.owner,
        candidates = candidate_count,
        returned = memories.len(),
        "memories retrieved"
    );

    Ok(memories)
}

/// Load every memory matching the filter, in insertion order.
pub fn query_memories(conn: &Connection, filter: &MemoryFilter<'_>) -> Result<Vec<Memory>> {
    let type_filter = filter.memory_type.map(|t| t.as_str());
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMORY_COLUMNS} FROM memories \
         WHERE user_id = ?1 AND character = ?2 AND importance >= ?3 \
         AND (?4 IS NULL OR memory_type = ?4) \
         ORDER BY rowid"
    ))?;

    let rows = stmt
        .query_map(
            params![
                filter.owner.user_id,
                filter.owner.character,
                filter.min_importance,
                type_filter,
            ],
            MemoryRow::from_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(MemoryRow::into_memory).collect()
}

/// Count one more access, stamp `last_accessed`, and write the `access` audit row.
pub fn bump_access(conn: &Connection, memory_id: &str, now: DateTime<Utc>) -> Result<()> {
    let updated = conn.execute(
        "UPDATE memories SET access_count = access_count + 1, last_accessed = ?1 WHERE id = ?2",
        params![encode_timestamp(now), memory_id],
    )?;
    if updated == 0 {
        return Err(AnimaError::NotFound(format!("memory {memory_id}")));
    }
    write_audit_log(conn, "access", memory_id, None, now)?;
    Ok(())
}
