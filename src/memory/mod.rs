//! Memory records: scoring, storage, ranking, retrieval and upkeep.
//!
//! Pure scorers ([`importance`], [`relevance`], [`rank`]) sit on top of the
//! [`keywords::KeywordExtractor`] seam; [`store`] and [`retrieve`] are the
//! transactional write and read paths.

pub mod forget;
pub mod importance;
pub mod journal;
pub mod keywords;
pub mod maintenance;
pub mod preferences;
pub mod rank;
pub mod relevance;
pub mod retrieve;
pub mod stats;
pub mod store;
pub mod types;
