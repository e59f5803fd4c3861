//! CLI `context` and `turn` commands: the chat-integration operations from a terminal.

use anyhow::Result;
use chrono::Utc;

use anima::config::AnimaConfig;
use anima::conversation::ConversationTurn;
use anima::engine::Anima;
use anima::memory::types::preview;

/// Print the context a character would get before replying.
///
/// Listed memories count as accessed.
pub fn context(config: &AnimaConfig, user_id: &str, character: Option<&str>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;
    let anima = Anima::new(config);
    let owner = super::owner(config, user_id, character);

    let context = anima.conversation_context(&mut conn, &owner, Utc::now())?;

    println!("Context for {owner}");
    println!("{}", "=".repeat(40));
    println!(
        "  Emotion: {} {:.2}",
        context.current_emotion.emotion, context.current_emotion.intensity
    );
    if let Some(ref relationship) = context.memory_summary.relationship {
        println!("  Interactions: {}", relationship.interaction_count);
    }

    println!();
    println!("Recent conversation:");
    if context.recent_memories.is_empty() {
        println!("  (none)");
    }
    for m in &context.recent_memories {
        println!("  - {}", preview(&m.content, 100));
    }

    println!();
    println!("Traits in this mood:");
    for (name, value) in &context.mood_traits {
        println!("  {name:<16} {value:.2}");
    }

    Ok(())
}

/// Arguments for [`turn`].
pub struct TurnArgs<'a> {
    pub user_id: &'a str,
    pub character: Option<&'a str>,
    pub user_message: String,
    pub character_response: String,
    pub emotion: Option<String>,
    pub intensity: Option<f64>,
    pub importance: Option<f64>,
    pub turn_id: Option<String>,
}

/// Record one conversation turn.
pub fn turn(config: &AnimaConfig, args: TurnArgs<'_>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;
    let anima = Anima::new(config);

    let turn = ConversationTurn {
        importance: args.importance,
        turn_id: args.turn_id,
        detected_emotion: args.emotion,
        emotion_intensity: args.intensity,
        ..ConversationTurn::new(
            super::owner(config, args.user_id, args.character),
            args.user_message,
            args.character_response,
        )
    };

    let processed = anima.process_conversation(&mut conn, &turn, Utc::now())?;

    println!("Stored user message:   {}", processed.user_memory.memory_id);
    println!("Stored character reply: {}", processed.character_memory.memory_id);
    if let Some(state) = processed.emotion {
        println!("Emotion set:           {} {:.2}", state.emotion, state.intensity);
    }

    Ok(())
}
