use anima::config::AnimaConfig;
use anima::db;
use anima::engine::Anima;
use anima::error::AnimaError;
use anima::memory::store::StoreMemoryRequest;
use anima::memory::types::{MemoryType, OwnerKey};
use chrono::Utc;
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("new.db");
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn on_disk_db_uses_wal_and_busy_timeout() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("anima.db")).unwrap();

    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    let timeout: i64 = conn
        .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn data_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("anima.db");
    let anima = Anima::new(&AnimaConfig::default());
    let owner = OwnerKey::new("user-1", "airi");

    let id = {
        let mut conn = db::open_database(&db_path).unwrap();
        let req = StoreMemoryRequest {
            owner: owner.clone(),
            content: "Keeps a journal every night".to_string(),
            memory_type: MemoryType::Fact,
            emotion: None,
            importance: None,
            metadata: None,
            direct_interaction: true,
        };
        anima.store_memory(&mut conn, &req, Utc::now()).unwrap().memory_id
    };

    let mut conn = db::open_database(&db_path).unwrap();
    let memories = anima
        .retrieve(&mut conn, &anima.retrieve_request(owner), Utc::now())
        .unwrap();
    assert_eq!(memories.len(), 1);
    assert_eq!(memories[0].id, id);
}

#[test]
fn health_check_passes_on_valid_db() {
    let conn = db::open_memory_database().unwrap();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.memory_count, 0);
    assert_eq!(report.emotion_count, 0);
    assert_eq!(report.trait_count, 0);
    assert_eq!(report.log_count, 0);
}

#[test]
fn corrupt_row_surfaces_as_error_not_panic() {
    let mut conn = db::open_memory_database().unwrap();
    conn.execute(
        "INSERT INTO memories (id, user_id, character, content, memory_type, importance, created_at, last_accessed) \
         VALUES ('bad', 'user-1', 'airi', 'text', 'fact', 0.5, 'not a time', 'not a time')",
        [],
    )
    .unwrap();

    let anima = Anima::new(&AnimaConfig::default());
    let err = anima
        .retrieve(
            &mut conn,
            &anima.retrieve_request(OwnerKey::new("user-1", "airi")),
            Utc::now(),
        )
        .unwrap_err();
    assert!(matches!(err, AnimaError::Corrupt(_)));
}
