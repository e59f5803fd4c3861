//! CLI `cleanup` command: retention sweep of old, unimportant, rarely used memories.

use anyhow::Result;
use chrono::Utc;

use anima::config::AnimaConfig;
use anima::memory::maintenance::{self, SweepPolicy};

/// Run the retention sweep. `retention_days` overrides the configured window.
pub fn cleanup(config: &AnimaConfig, retention_days: Option<u32>, dry_run: bool) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;

    let mut policy = SweepPolicy::from(&config.maintenance);
    if let Some(days) = retention_days {
        policy.retention_days = days;
    }

    let result = maintenance::retention_sweep(&mut conn, policy, dry_run, Utc::now())?;

    if result.candidates.is_empty() {
        println!("No memories eligible for cleanup.");
        return Ok(());
    }

    if dry_run {
        println!(
            "Found {} candidate(s) for cleanup (dry run, nothing deleted):\n",
            result.candidates.len()
        );
        println!(
            "{:<38} {:<14} {:<10} {:<6} Preview",
            "ID", "Type", "Importance", "Uses"
        );
        println!("{}", "-".repeat(100));
        for c in &result.candidates {
            println!(
                "{:<38} {:<14} {:<10.2} {:<6} {}",
                c.id, c.memory_type, c.importance, c.access_count, c.content_preview
            );
        }
    } else {
        println!(
            "Deleted {} memories older than {} days.",
            result.deleted, policy.retention_days
        );
    }

    Ok(())
}
