use anyhow::{Context, Result};
use serde::Serialize;

use anima::config::AnimaConfig;
use anima::emotion::{store::all_emotions, EmotionalState};
use anima::memory::store::all_memories;
use anima::memory::types::Memory;
use anima::personality::store::{all_traits, StoredTrait};

/// Export format: every memory, the emotional log and the trait rows.
#[derive(Debug, Serialize)]
struct ExportData {
    memories: Vec<Memory>,
    emotions: Vec<EmotionalState>,
    traits: Vec<StoredTrait>,
}

/// Export the whole store as JSON to stdout.
pub fn export(config: &AnimaConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = anima::db::open_database(&db_path)?;

    let data = ExportData {
        memories: all_memories(&conn).context("failed to read memories")?,
        emotions: all_emotions(&conn).context("failed to read emotional states")?,
        traits: all_traits(&conn).context("failed to read personality traits")?,
    };

    println!("{}", serde_json::to_string_pretty(&data)?);

    eprintln!(
        "Exported {} memories, {} emotional states and {} traits.",
        data.memories.len(),
        data.emotions.len(),
        data.traits.len()
    );

    Ok(())
}
