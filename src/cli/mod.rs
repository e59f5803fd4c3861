pub mod conversation;
pub mod doctor;
pub mod export;
pub mod inspect;
pub mod keywords;
pub mod maintenance;
pub mod mood;
pub mod personality;
pub mod preferences;
pub mod reset;
pub mod search;
pub mod stats;

use anima::config::AnimaConfig;
use anima::memory::types::OwnerKey;

/// Owner for a CLI command, falling back to the configured character.
pub fn owner(config: &AnimaConfig, user_id: &str, character: Option<&str>) -> OwnerKey {
    OwnerKey::new(
        user_id,
        character.unwrap_or(&config.storage.default_character),
    )
}
