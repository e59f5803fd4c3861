//! CLI `preferences` command: a user's preferences grouped by topic.

use anyhow::Result;
use chrono::Utc;

use anima::config::AnimaConfig;
use anima::engine::Anima;
use anima::memory::types::{preview, Memory};

pub fn preferences(
    config: &AnimaConfig,
    user_id: &str,
    character: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;
    let anima = Anima::new(config);
    let owner = super::owner(config, user_id, character);

    let report = anima.memory_preferences(&mut conn, &owner, limit, None, Utc::now())?;
    if report.total_count == 0 {
        println!("No preferences stored for {owner}.");
        return Ok(());
    }

    println!("{} preferences for {owner}", report.total_count);
    let groups = &report.categorized;
    for (label, memories) in [
        ("Food", &groups.food),
        ("Activities", &groups.activities),
        ("Personality", &groups.personality),
        ("Relationships", &groups.relationships),
        ("Other", &groups.other),
    ] {
        print_group(label, memories);
    }

    Ok(())
}

fn print_group(label: &str, memories: &[Memory]) {
    if memories.is_empty() {
        return;
    }
    println!();
    println!("{label}:");
    for m in memories {
        println!("  - {} ({:.2})", preview(&m.content, 100), m.importance);
    }
}
