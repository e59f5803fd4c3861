//! Pure ordering of a memory snapshot.
//!
//! The default order favours important, recent and frequently recalled
//! memories. Recency is a *linear* penalty per day here, unlike the
//! exponential intensity decay in [`crate::emotion`]; the two are kept apart.

use chrono::{DateTime, Utc};

use super::keywords::KeywordExtractor;
use super::relevance::similarity;
use super::types::Memory;

const IMPORTANCE_WEIGHT: f64 = 0.4;
const RECENCY_PENALTY_PER_DAY: f64 = 0.001;
const ACCESS_WEIGHT: f64 = 0.01;

const QUERY_IMPORTANCE_WEIGHT: f64 = 0.6;
const QUERY_RELEVANCE_WEIGHT: f64 = 0.4;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A memory paired with the score that placed it.
#[derive(Debug, Clone)]
pub struct Ranked {
    pub memory: Memory,
    pub score: f64,
    /// Set only by [`rerank_by_query`].
    pub relevance: Option<f64>,
}

/// Fractional days elapsed between `created_at` and `now`.
fn age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Default ordering score: importance, linear recency penalty, access count.
#[must_use]
pub fn default_score(memory: &Memory, now: DateTime<Utc>) -> f64 {
    memory.importance * IMPORTANCE_WEIGHT - RECENCY_PENALTY_PER_DAY * age_days(memory.created_at, now)
        + f64::from(memory.access_count) * ACCESS_WEIGHT
}

/// Order memories by [`default_score`], highest first. Ties keep input order.
pub fn rank(memories: Vec<Memory>, now: DateTime<Utc>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = memories
        .into_iter()
        .map(|memory| Ranked {
            score: default_score(&memory, now),
            memory,
            relevance: None,
        })
        .collect();
    sort_descending(&mut ranked);
    ranked
}

/// Re-order an already limited result by importance and relevance to `query`.
///
/// Only the order changes; no element is added or removed.
pub fn rerank_by_query(
    ranked: Vec<Ranked>,
    query: &str,
    extractor: &dyn KeywordExtractor,
) -> Vec<Ranked> {
    let mut rescored: Vec<Ranked> = ranked
        .into_iter()
        .map(|r| {
            let relevance = similarity(extractor, &r.memory.content, query);
            Ranked {
                score: r.memory.importance * QUERY_IMPORTANCE_WEIGHT
                    + relevance * QUERY_RELEVANCE_WEIGHT,
                relevance: Some(relevance),
                memory: r.memory,
            }
        })
        .collect();
    sort_descending(&mut rescored);
    rescored
}

fn sort_descending(ranked: &mut [Ranked]) {
    // sort_by is stable, so equal scores keep their prior relative order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::keywords::StemmingExtractor;
    use crate::memory::types::{MemoryType, OwnerKey};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn memory(id: &str, content: &str, importance: f64, days_old: i64, access_count: u32) -> Memory {
        let created = now() - Duration::days(days_old);
        Memory {
            id: id.to_string(),
            owner: OwnerKey::new("u1", "airi"),
            content: content.to_string(),
            memory_type: MemoryType::Fact,
            emotion: None,
            importance,
            created_at: created,
            last_accessed: created,
            access_count,
            metadata: None,
        }
    }

    fn ids(ranked: &[Ranked]) -> Vec<&str> {
        ranked.iter().map(|r| r.memory.id.as_str()).collect()
    }

    #[test]
    fn importance_dominates_small_age_differences() {
        let ranked = rank(
            vec![memory("low", "a", 0.2, 0, 0), memory("high", "b", 0.9, 30, 0)],
            now(),
        );
        assert_eq!(ids(&ranked), vec!["high", "low"]);
        // 0.9 * 0.4 - 0.001 * 30
        assert!((ranked[0].score - 0.33).abs() < 1e-9);
    }

    #[test]
    fn recency_penalty_is_linear_in_days() {
        let m = memory("m", "a", 0.5, 0, 0);
        let mut older = m.clone();
        older.created_at = now() - Duration::hours(36);
        let delta = default_score(&m, now()) - default_score(&older, now());
        assert!((delta - 0.0015).abs() < 1e-9);
    }

    #[test]
    fn access_count_breaks_near_ties() {
        let ranked = rank(
            vec![memory("cold", "a", 0.5, 1, 0), memory("warm", "b", 0.5, 1, 3)],
            now(),
        );
        assert_eq!(ids(&ranked), vec!["warm", "cold"]);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let ranked = rank(
            vec![
                memory("first", "a", 0.5, 2, 0),
                memory("second", "b", 0.5, 2, 0),
                memory("third", "c", 0.5, 2, 0),
            ],
            now(),
        );
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn rank_is_idempotent_for_fixed_snapshot() {
        let snapshot = vec![
            memory("a", "x", 0.3, 5, 1),
            memory("b", "y", 0.7, 50, 0),
            memory("c", "z", 0.7, 1, 4),
        ];
        let once = rank(snapshot.clone(), now());
        let twice = rank(once.iter().map(|r| r.memory.clone()).collect(), now());
        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(ids(&once), ids(&rank(snapshot, now())));
    }

    #[test]
    fn query_changes_order_not_membership() {
        let ex = StemmingExtractor::new();
        let ranked = rank(
            vec![
                memory("tea", "enjoys green tea every morning", 0.6, 0, 0),
                memory("cat", "has a cat named Mochi", 0.62, 0, 0),
            ],
            now(),
        );
        assert_eq!(ids(&ranked), vec!["cat", "tea"]);

        let reranked = rerank_by_query(ranked, "green tea", &ex);
        assert_eq!(ids(&reranked), vec!["tea", "cat"]);
        assert!(reranked[0].relevance.unwrap() > 0.0);
        assert_eq!(reranked[1].relevance, Some(0.0));
    }
}
