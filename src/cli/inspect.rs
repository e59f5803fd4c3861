//! CLI `inspect` command: display full details for a single memory.

use anyhow::{Context, Result};

use anima::config::AnimaConfig;
use anima::memory::store::{audit_trail, get_memory};

/// Inspect a single memory by ID. Reading it here does not count as an access.
pub fn inspect(config: &AnimaConfig, id: &str) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = anima::db::open_database(&db_path)?;

    let m = get_memory(&conn, id)?.with_context(|| format!("memory not found: {id}"))?;

    println!("Memory: {}", m.id);
    println!("{}", "=".repeat(50));
    println!("  Owner:          {}", m.owner);
    println!("  Type:           {}", m.memory_type);
    if let Some(ref emotion) = m.emotion {
        println!("  Emotion:        {emotion}");
    }
    println!("  Importance:     {:.2}", m.importance);
    println!("  Access count:   {}", m.access_count);
    println!("  Last accessed:  {}", m.last_accessed);
    println!("  Created:        {}", m.created_at);
    if let Some(ref meta) = m.metadata {
        println!("  Metadata:       {}", serde_json::to_string_pretty(meta)?);
    }
    println!();
    println!("Content:");
    println!("  {}", m.content);

    let log = audit_trail(&conn, id)?;
    if !log.is_empty() {
        println!();
        println!("Audit Log:");
        for entry in log {
            let details = entry.details.map(|d| d.to_string()).unwrap_or_default();
            println!("  {} [{}] {}", entry.created_at, entry.operation, details);
        }
    }

    Ok(())
}
