use anyhow::Result;

use anima::config::AnimaConfig;
use anima::memory::types::MemoryType;

/// Display store-wide statistics in the terminal.
pub fn stats(config: &AnimaConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = anima::db::open_database(&db_path)?;

    let response = anima::memory::stats::store_stats(&conn, Some(&db_path))?;

    println!("Memory Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total memories:      {}", response.total_memories);
    println!("  Owners:              {}", response.owners);
    println!();

    println!("By Type:");
    for t in MemoryType::ALL {
        let count = response.by_type.get(t.as_str()).copied().unwrap_or(0);
        println!("  {:<20} {}", t, count);
    }
    println!();

    println!("Emotional states:      {}", response.emotional_states);
    println!("Personality traits:    {}", response.personality_traits);
    println!("Database size:         {} bytes", response.db_size_bytes);

    if let Some(ref oldest) = response.oldest_memory {
        println!("Oldest memory:         {oldest}");
    }
    if let Some(ref newest) = response.newest_memory {
        println!("Newest memory:         {newest}");
    }

    Ok(())
}
