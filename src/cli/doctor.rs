//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use anima::config::AnimaConfig;
use anima::db;
use anima::memory::keywords::STEMMER_ID;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &AnimaConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `anima serve` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("anima Health Report");
    println!("===================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Keyword stemmer:");
    println!("  Stored:          {}", report.keyword_stemmer.as_deref().unwrap_or("(not set)"));
    println!("  Current:         {STEMMER_ID}");
    match report.keyword_stemmer.as_deref() {
        Some(stored) if stored != STEMMER_ID => {
            println!("  WARNING: stored auto_keywords came from a different stemmer.");
        }
        Some(_) => println!("  Status:          OK (match)"),
        None => {}
    }
    println!();
    println!("Row counts:");
    println!("  Memories:        {}", report.memory_count);
    println!("  Emotions:        {}", report.emotion_count);
    println!("  Traits:          {}", report.trait_count);
    println!("  Relationships:   {}", report.relationship_count);
    println!("  Audit log:       {}", report.log_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.anima/anima.db");
        println!("  2. Or keep what is readable: anima export > backup.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
