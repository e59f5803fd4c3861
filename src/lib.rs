//! Memory, emotion and personality engine for companion characters.
//!
//! anima persists short textual memories plus the emotional and personality
//! state of a character talking to a user, and ranks those memories back when
//! the conversation needs them. Everything is keyed by an [`OwnerKey`]
//! (user, character):
//!
//! | Component | What it does |
//! |-----------|--------------|
//! | **Importance** | Scores a new memory in `[0, 1]` from its type, length, emotion and keywords |
//! | **Relevance** | Jaccard overlap of stemmed keyword sets between memory and query |
//! | **Ranking** | Orders by importance, linear recency and access count, then re-ranks by query |
//! | **Emotion** | Append-only emotional log; the current state is a reducer over live rows |
//! | **Personality** | Bounded trait vector nudged by emotions, classified into archetypes |
//!
//! # Architecture
//!
//! - **Storage**: SQLite via `rusqlite`; every public operation is one transaction
//! - **Keywords**: stop-word filtered, Porter-stemmed terms (`rust-stemmers`)
//! - **Events**: trait adjustments are emitted as [`events::DomainEvent`]s and
//!   journaled back into memory by a subscriber
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations, and health checks
//! - [`memory`]: Memory storage, scoring, ranking, retrieval and maintenance
//! - [`emotion`]: Emotional state log, compatibility and transition scoring
//! - [`personality`]: Trait vector, feedback from emotions, archetypes
//! - [`conversation`]: Chat-integration context and conversation-turn shapes
//! - [`engine`]: The [`engine::Anima`] facade wiring everything together
//!
//! [`OwnerKey`]: memory::types::OwnerKey

pub mod config;
pub mod conversation;
pub mod db;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod events;
pub mod memory;
pub mod personality;
