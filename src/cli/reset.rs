//! CLI `reset` command: delete all stored state after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use anima::config::AnimaConfig;
use anima::memory::keywords::STEMMER_ID;

/// Delete every memory, emotion, trait and relationship after user confirmation.
pub fn reset(config: &AnimaConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL memories, emotions, personality traits and audit logs.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let mut conn = anima::db::open_database(&db_path)?;
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM memory_log;
         DELETE FROM memories;
         DELETE FROM emotional_states;
         DELETE FROM personality_traits;
         DELETE FROM relationships;",
    )?;
    // no stored auto_keywords remain, so the current stemmer owns the store again
    anima::db::migrations::set_keyword_stemmer(&tx, STEMMER_ID)?;
    tx.commit()?;

    tracing::info!(db = %db_path.display(), "store reset");
    println!("All state deleted. Database reset complete.");
    Ok(())
}
