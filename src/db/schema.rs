//! SQL DDL for all anima tables.
//!
//! Defines the `memories`, `emotional_states`, `personality_traits`,
//! `relationships`, `memory_log`, and `schema_meta` tables. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for anima's core tables.
const SCHEMA_SQL: &str = r#"
-- Core memory storage
CREATE TABLE IF NOT EXISTS memories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    character TEXT NOT NULL,
    content TEXT NOT NULL,
    memory_type TEXT NOT NULL CHECK(memory_type IN (
        'conversation','event','preference','fact','relationship','milestone','personality_change'
    )),
    emotion TEXT,
    importance REAL NOT NULL DEFAULT 0.5 CHECK(importance >= 0.0 AND importance <= 1.0),
    created_at TEXT NOT NULL,
    last_accessed TEXT NOT NULL,
    access_count INTEGER NOT NULL DEFAULT 0 CHECK(access_count >= 0),
    metadata TEXT
);

CREATE INDEX IF NOT EXISTS idx_memories_owner ON memories(user_id, character);
CREATE INDEX IF NOT EXISTS idx_memories_created ON memories(created_at);
CREATE INDEX IF NOT EXISTS idx_memories_importance ON memories(importance);

-- Append-only emotional state log
CREATE TABLE IF NOT EXISTS emotional_states (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    character TEXT NOT NULL,
    emotion TEXT NOT NULL,
    intensity REAL NOT NULL CHECK(intensity >= 0.0 AND intensity <= 1.0),
    context TEXT,
    created_at TEXT NOT NULL,
    duration INTEGER NOT NULL DEFAULT 3600 CHECK(duration >= 0),
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_emotions_owner ON emotional_states(user_id, character);
CREATE INDEX IF NOT EXISTS idx_emotions_created ON emotional_states(created_at);

-- Personality trait vector, one row per (owner, trait)
CREATE TABLE IF NOT EXISTS personality_traits (
    user_id TEXT NOT NULL,
    character TEXT NOT NULL,
    trait_name TEXT NOT NULL,
    trait_value REAL NOT NULL CHECK(trait_value >= 0.0 AND trait_value <= 1.0),
    last_updated TEXT NOT NULL,
    PRIMARY KEY (user_id, character, trait_name)
);

-- Per-owner relationship aggregate
CREATE TABLE IF NOT EXISTS relationships (
    user_id TEXT NOT NULL,
    character TEXT NOT NULL,
    relationship_level REAL NOT NULL DEFAULT 0.5,
    trust_level REAL NOT NULL DEFAULT 0.5,
    affection_level REAL NOT NULL DEFAULT 0.5,
    interaction_count INTEGER NOT NULL DEFAULT 0,
    last_interaction TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, character)
);

-- Audit log
CREATE TABLE IF NOT EXISTS memory_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('create','access','update','delete','sweep')),
    memory_id TEXT NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for expected in [
            "memories",
            "emotional_states",
            "personality_traits",
            "relationships",
            "memory_log",
            "schema_meta",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table {expected}");
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn importance_check_constraint_rejects_out_of_range() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO memories (id, user_id, character, content, memory_type, importance, created_at, last_accessed) \
             VALUES ('m1', 'u', 'c', 'hello', 'fact', 1.5, 't', 't')",
            [],
        );
        assert!(result.is_err());
    }
}
