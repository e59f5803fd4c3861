use anima::db;
use rusqlite::Connection;

fn names(conn: &Connection, kind: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%' ORDER BY name")
        .unwrap();
    let names = stmt
        .query_map([kind], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<String>>>()
        .unwrap();
    names
}

#[test]
fn full_schema_creates_all_tables_and_indexes() {
    let conn = db::open_memory_database().unwrap();

    let tables = names(&conn, "table");
    for table in [
        "emotional_states",
        "memories",
        "memory_log",
        "personality_traits",
        "relationships",
        "schema_meta",
    ] {
        assert!(tables.iter().any(|t| t == table), "missing table {table}");
    }

    let indexes = names(&conn, "index");
    for index in [
        "idx_memories_owner",
        "idx_memories_created",
        "idx_memories_importance",
        "idx_emotions_owner",
        "idx_emotions_created",
        "idx_emotions_live",
    ] {
        assert!(indexes.iter().any(|i| i == index), "missing index {index}");
    }
}

#[test]
fn schema_init_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::schema::init_schema(&conn).unwrap();

    let version: String = conn
        .query_row("SELECT value FROM schema_meta WHERE key = 'schema_version'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, "1");
}

#[test]
fn check_constraints_reject_out_of_range_rows() {
    let conn = db::open_memory_database().unwrap();

    let bad_importance = conn.execute(
        "INSERT INTO memories (id, user_id, character, content, memory_type, importance, created_at, last_accessed) \
         VALUES ('a', 'u', 'c', 'text', 'fact', 1.5, 'x', 'x')",
        [],
    );
    assert!(bad_importance.is_err());

    let bad_type = conn.execute(
        "INSERT INTO memories (id, user_id, character, content, memory_type, importance, created_at, last_accessed) \
         VALUES ('b', 'u', 'c', 'text', 'diary', 0.5, 'x', 'x')",
        [],
    );
    assert!(bad_type.is_err());

    let bad_trait = conn.execute(
        "INSERT INTO personality_traits (user_id, character, trait_name, trait_value, last_updated) \
         VALUES ('u', 'c', 'shyness', -0.1, 'x')",
        [],
    );
    assert!(bad_trait.is_err());

    let bad_op = conn.execute(
        "INSERT INTO memory_log (operation, memory_id, created_at) VALUES ('rename', 'a', 'x')",
        [],
    );
    assert!(bad_op.is_err());
}
