use anyhow::Result;
use chrono::Utc;

use anima::config::AnimaConfig;
use anima::engine::Anima;
use anima::memory::types::{preview, MemoryType};

/// Terminal filters for [`search`].
pub struct SearchArgs<'a> {
    pub user_id: &'a str,
    pub character: Option<&'a str>,
    pub query: Option<&'a str>,
    pub memory_type: Option<MemoryType>,
    pub limit: Option<usize>,
}

/// Rank an owner's memories from the terminal, re-ranked by `query` when given.
///
/// This is a real retrieval: returned memories have their access counters bumped.
pub fn search(config: &AnimaConfig, args: SearchArgs<'_>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;
    let anima = Anima::new(config);

    let mut req = anima.retrieve_request(super::owner(config, args.user_id, args.character));
    req.query = args.query.map(str::to_string);
    req.memory_type = args.memory_type;
    if let Some(limit) = args.limit {
        req.limit = limit;
    }

    let memories = anima.retrieve(&mut conn, &req, Utc::now())?;

    if memories.is_empty() {
        println!("No memories found for {}.", req.owner);
        return Ok(());
    }

    println!("Found {} memories for {}\n", memories.len(), req.owner);

    for (i, m) in memories.iter().enumerate() {
        println!(
            "  {}. [{}] {} (importance: {:.2}, uses: {})",
            i + 1,
            m.memory_type,
            preview(&m.content, 120),
            m.importance,
            m.access_count,
        );
        println!("     id: {}  created: {}", m.id, m.created_at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}
