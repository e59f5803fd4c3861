#![allow(dead_code)]

use anima::config::AnimaConfig;
use anima::db;
use anima::engine::Anima;
use anima::memory::store::StoreMemoryRequest;
use anima::memory::types::{MemoryType, OwnerKey};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Fixed clock so recency and expiry are deterministic.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
}

pub fn anima() -> Anima {
    Anima::new(&AnimaConfig::default())
}

pub fn owner() -> OwnerKey {
    OwnerKey::new("user-1", "airi")
}

pub fn request(content: &str, memory_type: MemoryType) -> StoreMemoryRequest {
    StoreMemoryRequest {
        owner: owner(),
        content: content.to_string(),
        memory_type,
        emotion: None,
        importance: None,
        metadata: None,
        direct_interaction: true,
    }
}

/// Store a memory with an explicit importance at `at`. Returns the memory ID.
pub fn store_at(
    conn: &mut Connection,
    anima: &Anima,
    content: &str,
    memory_type: MemoryType,
    importance: f64,
    at: DateTime<Utc>,
) -> String {
    let mut req = request(content, memory_type);
    req.importance = Some(importance);
    anima.store_memory(conn, &req, at).unwrap().memory_id
}

pub fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}
