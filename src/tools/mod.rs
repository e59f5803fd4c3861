pub mod conversation;
pub mod emotion;
pub mod extract_keywords;
pub mod manage_memory;
pub mod memory_inspect;
pub mod memory_preferences;
pub mod memory_summary;
pub mod personality;
pub mod retrieve_memories;
pub mod store_memory;

use chrono::Utc;
use conversation::{ConversationContextParams, ProcessConversationParams};
use emotion::{
    CurrentEmotionParams, EmotionCompatibilityParams, EmotionHistoryParams, UpdateEmotionParams,
};
use extract_keywords::ExtractKeywordsParams;
use manage_memory::{DeleteMemoryParams, UpdateImportanceParams};
use memory_inspect::MemoryInspectParams;
use memory_preferences::MemoryPreferencesParams;
use memory_summary::MemorySummaryParams;
use personality::{AdjustTraitParams, PersonalitySummaryParams};
use retrieve_memories::RetrieveMemoriesParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use store_memory::StoreMemoryParams;

use anima::config::AnimaConfig;
use anima::conversation::ConversationTurn;
use anima::engine::Anima;
use anima::error::AnimaError;
use anima::memory::store::StoreMemoryRequest;
use anima::memory::types::{MemoryType, OwnerKey};

/// Window used by `memory_summary` when the caller gives none.
const DEFAULT_SUMMARY_DAYS: u32 = 30;

/// The anima MCP tool handler. Holds the shared connection, the engine facade
/// and config, and exposes every tool via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct AnimaTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    anima: Arc<Anima>,
    config: Arc<AnimaConfig>,
}

#[tool_router]
impl AnimaTools {
    pub fn new(db: Arc<Mutex<Connection>>, anima: Arc<Anima>, config: Arc<AnimaConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            anima,
            config,
        }
    }

    /// Store a new memory about the user.
    #[tool(description = "Store a memory about the user. Types: conversation, event, preference, fact, relationship, milestone. Importance is scored automatically when omitted.")]
    async fn store_memory(
        &self,
        Parameters(params): Parameters<StoreMemoryParams>,
    ) -> Result<String, String> {
        let memory_type: MemoryType = params.r#type.parse()?;
        let owner = self.owner(params.user_id, params.character);

        tracing::info!(
            owner = %owner,
            content_len = params.content.len(),
            memory_type = %memory_type,
            "store_memory called"
        );

        let req = StoreMemoryRequest {
            owner,
            content: params.content,
            memory_type,
            emotion: params.emotion,
            importance: params.importance,
            metadata: params.metadata,
            direct_interaction: params.direct_interaction.unwrap_or(false),
        };

        self.with_db(move |conn, anima| anima.store_memory(conn, &req, Utc::now()))
            .await
    }

    /// Rank and return the user's memories.
    #[tool(description = "Retrieve the user's memories ranked by importance, recency and use. An optional query re-ranks the results by keyword overlap.")]
    async fn retrieve_memories(
        &self,
        Parameters(params): Parameters<RetrieveMemoriesParams>,
    ) -> Result<String, String> {
        let memory_type = params
            .r#type
            .as_deref()
            .map(str::parse::<MemoryType>)
            .transpose()?;
        let owner = self.owner(params.user_id, params.character);

        tracing::debug!(owner = %owner, query = ?params.query, "retrieve_memories called");

        let mut req = self.anima.retrieve_request(owner);
        req.query = params.query;
        req.memory_type = memory_type;
        if let Some(limit) = params.limit {
            req.limit = limit;
        }
        if let Some(min_importance) = params.min_importance {
            req.min_importance = min_importance;
        }

        self.with_db(move |conn, anima| {
            let memories = anima.retrieve(conn, &req, Utc::now())?;
            Ok(serde_json::json!({
                "total": memories.len(),
                "memories": memories,
            }))
        })
        .await
    }

    /// Inspect a specific memory by ID.
    #[tool(description = "Inspect a memory by ID. Returns the full record without counting as an access.")]
    async fn memory_inspect(
        &self,
        Parameters(params): Parameters<MemoryInspectParams>,
    ) -> Result<String, String> {
        tracing::debug!(memory_id = %params.id, "memory_inspect called");

        self.with_db(move |conn, _| {
            anima::memory::store::get_memory(conn, &params.id)?
                .ok_or_else(|| AnimaError::NotFound(format!("memory {}", params.id)))
        })
        .await
    }

    /// Summarize recent memory activity for one user.
    #[tool(description = "Summarize the user's recent memories: counts and mean importance per type, the most important memories, and the relationship record.")]
    async fn memory_summary(
        &self,
        Parameters(params): Parameters<MemorySummaryParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        let days = params.days.unwrap_or(DEFAULT_SUMMARY_DAYS);

        tracing::debug!(owner = %owner, days, "memory_summary called");

        self.with_db(move |conn, anima| anima.memory_summary(conn, &owner, days, Utc::now()))
            .await
    }

    #[tool(description = "List the user's preferences in rank order, also grouped into food, activities, personality, relationships and other.")]
    async fn memory_preferences(
        &self,
        Parameters(params): Parameters<MemoryPreferencesParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        tracing::debug!(owner = %owner, "memory_preferences called");

        self.with_db(move |conn, anima| {
            anima.memory_preferences(conn, &owner, params.limit, params.min_importance, Utc::now())
        })
        .await
    }

    #[tool(description = "Delete a memory by ID. The deletion is recorded in the audit log.")]
    async fn delete_memory(
        &self,
        Parameters(params): Parameters<DeleteMemoryParams>,
    ) -> Result<String, String> {
        tracing::info!(memory_id = %params.id, "delete_memory called");

        self.with_db(move |conn, anima| {
            anima.delete_memory(conn, &params.id, params.reason.as_deref(), Utc::now())
        })
        .await
    }

    #[tool(description = "Set the importance (0.0-1.0) of an existing memory.")]
    async fn update_importance(
        &self,
        Parameters(params): Parameters<UpdateImportanceParams>,
    ) -> Result<String, String> {
        tracing::info!(
            memory_id = %params.id,
            importance = params.importance,
            "update_importance called"
        );

        self.with_db(move |conn, anima| {
            anima.update_importance(conn, &params.id, params.importance, Utc::now())
        })
        .await
    }

    /// Record a new emotional state for the character.
    #[tool(description = "Set the character's emotion toward the user. The emotion lasts for duration_secs and nudges personality traits. With transition=true the response includes a transition score against the previous emotion.")]
    async fn update_emotion(
        &self,
        Parameters(params): Parameters<UpdateEmotionParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);

        tracing::info!(
            owner = %owner,
            emotion = %params.emotion,
            intensity = params.intensity,
            "update_emotion called"
        );

        if params.transition.unwrap_or(false) {
            self.with_db(move |conn, anima| {
                anima.transition_emotion(
                    conn,
                    &owner,
                    &params.emotion,
                    params.intensity,
                    params.context.as_deref(),
                    params.duration_secs,
                    Utc::now(),
                )
            })
            .await
        } else {
            self.with_db(move |conn, anima| {
                anima.update_emotion(
                    conn,
                    &owner,
                    &params.emotion,
                    params.intensity,
                    params.context.as_deref(),
                    params.duration_secs,
                    Utc::now(),
                )
            })
            .await
        }
    }

    #[tool(description = "Get the character's current emotion toward the user. Neutral at 0.5 when nothing is active.")]
    async fn current_emotion(
        &self,
        Parameters(params): Parameters<CurrentEmotionParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        tracing::debug!(owner = %owner, "current_emotion called");

        self.with_db(move |conn, anima| anima.current_emotion(conn, &owner, Utc::now()))
            .await
    }

    #[tool(description = "List the character's recent emotions toward the user, newest first, with stability and category patterns.")]
    async fn emotion_history(
        &self,
        Parameters(params): Parameters<EmotionHistoryParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        tracing::debug!(owner = %owner, hours = ?params.hours, "emotion_history called");

        self.with_db(move |conn, anima| {
            anima.emotion_history(conn, &owner, params.hours, params.limit, Utc::now())
        })
        .await
    }

    #[tool(description = "Score how naturally the character could move from its current emotion to a target emotion, with a suggested starting intensity.")]
    async fn emotion_compatibility(
        &self,
        Parameters(params): Parameters<EmotionCompatibilityParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        tracing::debug!(owner = %owner, target = %params.target_emotion, "emotion_compatibility called");

        self.with_db(move |conn, anima| {
            anima.emotion_compatibility(conn, &owner, &params.target_emotion, Utc::now())
        })
        .await
    }

    /// Nudge one personality trait.
    #[tool(description = "Adjust one personality trait by a signed amount; the value is clamped to 0.0-1.0. A reason writes a personality_change memory.")]
    async fn adjust_trait(
        &self,
        Parameters(params): Parameters<AdjustTraitParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);

        tracing::info!(
            owner = %owner,
            trait_name = %params.trait_name,
            adjustment = params.adjustment,
            "adjust_trait called"
        );

        self.with_db(move |conn, anima| {
            anima.adjust_trait(
                conn,
                &owner,
                &params.trait_name,
                params.adjustment,
                params.reason.as_deref(),
                Utc::now(),
            )
        })
        .await
    }

    #[tool(description = "Describe the character's personality: archetype, a one-line summary, dominant traits and every trait value.")]
    async fn personality_summary(
        &self,
        Parameters(params): Parameters<PersonalitySummaryParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        tracing::debug!(owner = %owner, "personality_summary called");

        self.with_db(move |conn, anima| anima.personality_summary(conn, &owner, Utc::now()))
            .await
    }

    /// Everything a character needs before it replies.
    #[tool(description = "Get context for the next reply: up to 5 recent conversation memories, the current emotion, traits shifted by that mood, and a 7-day memory summary.")]
    async fn conversation_context(
        &self,
        Parameters(params): Parameters<ConversationContextParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);
        tracing::debug!(owner = %owner, "conversation_context called");

        self.with_db(move |conn, anima| anima.conversation_context(conn, &owner, Utc::now()))
            .await
    }

    #[tool(description = "Record one conversation turn: stores the user message and the character's reply as conversation memories, and sets the detected emotion if given.")]
    async fn process_conversation(
        &self,
        Parameters(params): Parameters<ProcessConversationParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.user_id, params.character);

        tracing::info!(
            owner = %owner,
            turn_id = ?params.turn_id,
            detected_emotion = ?params.detected_emotion,
            "process_conversation called"
        );

        let turn = ConversationTurn {
            importance: params.importance,
            turn_id: params.turn_id,
            detected_emotion: params.detected_emotion,
            emotion_intensity: params.emotion_intensity,
            ..ConversationTurn::new(owner, params.user_message, params.character_response)
        };

        self.with_db(move |conn, anima| anima.process_conversation(conn, &turn, Utc::now()))
            .await
    }

    #[tool(description = "Extract stemmed keywords from a text, with its cleaned form and word count. Reads no stored data.")]
    async fn extract_keywords(
        &self,
        Parameters(params): Parameters<ExtractKeywordsParams>,
    ) -> Result<String, String> {
        tracing::debug!(text_len = params.text.len(), "extract_keywords called");

        let analysis = self.anima.analyze_keywords(&params.text, params.max_keywords);
        serde_json::to_string(&analysis).map_err(|e| format!("serialization failed: {e}"))
    }
}

impl AnimaTools {
    fn owner(&self, user_id: String, character: Option<String>) -> OwnerKey {
        let character =
            character.unwrap_or_else(|| self.config.storage.default_character.clone());
        OwnerKey::new(user_id, character)
    }

    /// Run `op` against the shared connection on the blocking pool and
    /// serialize its result.
    async fn with_db<T, F>(&self, op: F) -> Result<String, String>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&mut Connection, &Anima) -> anima::error::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let anima = Arc::clone(&self.anima);

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = db
                .lock()
                .map_err(|e| format!("db lock poisoned: {e}"))?;
            op(&mut *conn, anima.as_ref()).map_err(|e| {
                tracing::warn!(error = %e, "tool operation failed");
                e.to_string()
            })
        })
        .await
        .map_err(|e| format!("db task failed: {e}"))??;

        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for AnimaTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "anima keeps a companion character's memories, emotions and personality. \
                 Call conversation_context before replying and process_conversation after. \
                 Use store_memory and retrieve_memories for recall, update_emotion and \
                 current_emotion for mood, and adjust_trait to evolve the personality."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> AnimaTools {
        let config = AnimaConfig::default();
        let conn = anima::db::open_memory_database().unwrap();
        AnimaTools::new(
            Arc::new(Mutex::new(conn)),
            Arc::new(Anima::new(&config)),
            Arc::new(config),
        )
    }

    fn store_params(content: &str, direct_interaction: Option<bool>) -> StoreMemoryParams {
        StoreMemoryParams {
            user_id: "user-1".into(),
            character: None,
            content: content.into(),
            r#type: "preference".into(),
            emotion: None,
            importance: None,
            metadata: None,
            direct_interaction,
        }
    }

    fn importance_of(response: &str) -> f64 {
        let value: serde_json::Value = serde_json::from_str(response).unwrap();
        value["importance_used"].as_f64().unwrap()
    }

    #[tokio::test]
    async fn short_preference_scores_base_without_interaction_bonus() {
        let tools = tools();

        // ten characters, all stop words: base 0.80 plus a 0.005 length bonus
        let response = tools
            .store_memory(Parameters(store_params("I am on it", None)))
            .await
            .unwrap();
        assert!((importance_of(&response) - 0.80).abs() < 0.01);

        let direct = tools
            .store_memory(Parameters(store_params("I am on it", Some(true))))
            .await
            .unwrap();
        assert!((importance_of(&direct) - importance_of(&response) - 0.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn invalid_type_is_reported_as_error_text() {
        let mut params = store_params("likes tea", None);
        params.r#type = "diary".into();
        let err = tools().store_memory(Parameters(params)).await.unwrap_err();
        assert!(err.contains("diary"));
    }

    #[tokio::test]
    async fn conversation_turn_round_trips_through_context() {
        let tools = tools();

        tools
            .process_conversation(Parameters(ProcessConversationParams {
                user_id: "user-1".into(),
                character: None,
                user_message: "I adopted a kitten".into(),
                character_response: "What will you name it".into(),
                importance: None,
                turn_id: Some("t-9".into()),
                detected_emotion: Some("excited".into()),
                emotion_intensity: Some(0.7),
            }))
            .await
            .unwrap();

        let response = tools
            .conversation_context(Parameters(ConversationContextParams {
                user_id: "user-1".into(),
                character: None,
            }))
            .await
            .unwrap();
        let context: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(context["recent_memories"].as_array().unwrap().len(), 2);
        assert_eq!(context["current_emotion"]["emotion"], "excited");
    }

    #[tokio::test]
    async fn keyword_extraction_needs_no_storage() {
        let response = tools()
            .extract_keywords(Parameters(ExtractKeywordsParams {
                text: "Guitar practice, then more guitar".into(),
                max_keywords: Some(1),
            }))
            .await
            .unwrap();
        let analysis: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(analysis["keywords"], serde_json::json!(["guitar"]));
        assert_eq!(analysis["word_count"], 5);
    }
}
