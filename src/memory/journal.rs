//! Journals personality changes back into the owner's memories.

use rusqlite::Connection;

use crate::error::Result;
use crate::events::{DomainEvent, EventSubscriber};
use crate::memory::store::{insert_memory, NewMemory};
use crate::memory::types::MemoryType;

/// Importance given to every journal entry.
pub const JOURNAL_IMPORTANCE: f64 = 0.6;

/// Stores a `personality_change` memory for each reasoned trait adjustment.
#[derive(Debug, Default, Clone, Copy)]
pub struct PersonalityJournal;

impl EventSubscriber for PersonalityJournal {
    fn handle(&self, conn: &Connection, event: &DomainEvent) -> Result<()> {
        let DomainEvent::TraitAdjusted {
            owner,
            trait_name,
            old_value,
            new_value,
            adjustment,
            reason,
            at,
        } = event;

        let content = format!(
            "Personality trait '{trait_name}' adjusted from {old_value:.2} to {new_value:.2}. Reason: {reason}"
        );
        let metadata = serde_json::json!({
            "trait_name": trait_name,
            "old_value": old_value,
            "new_value": new_value,
            "adjustment": adjustment,
            "reason": reason,
        });

        let memory_id = insert_memory(
            conn,
            &NewMemory {
                owner: owner.clone(),
                content,
                memory_type: MemoryType::PersonalityChange,
                emotion: None,
                importance: JOURNAL_IMPORTANCE,
                metadata: Some(metadata),
            },
            *at,
        )?;

        tracing::debug!(owner = %owner, trait_name = %trait_name, memory_id = %memory_id, "trait change journaled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::memory::retrieve::{query_memories, MemoryFilter};
    use crate::memory::types::OwnerKey;
    use chrono::Utc;

    #[test]
    fn writes_personality_change_memory() {
        let conn = db::open_memory_database().unwrap();
        let owner = OwnerKey::new("u1", "airi");
        let event = DomainEvent::TraitAdjusted {
            owner: owner.clone(),
            trait_name: "cheerfulness".into(),
            old_value: 0.7,
            new_value: 0.75,
            adjustment: 0.05,
            reason: "a good day".into(),
            at: Utc::now(),
        };

        PersonalityJournal.handle(&conn, &event).unwrap();

        let memories = query_memories(
            &conn,
            &MemoryFilter {
                owner: &owner,
                min_importance: 0.0,
                memory_type: Some(MemoryType::PersonalityChange),
            },
        )
        .unwrap();
        assert_eq!(memories.len(), 1);
        let m = &memories[0];
        assert_eq!(
            m.content,
            "Personality trait 'cheerfulness' adjusted from 0.70 to 0.75. Reason: a good day"
        );
        assert_eq!(m.importance, JOURNAL_IMPORTANCE);
        assert_eq!(m.metadata.as_ref().unwrap()["trait_name"], "cheerfulness");
    }
}
