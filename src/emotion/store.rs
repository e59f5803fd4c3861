//! Row access for the append-only `emotional_states` log.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::EmotionalState;
use crate::db::{decode_timestamp, encode_timestamp};
use crate::error::{AnimaError, Result};
use crate::memory::types::OwnerKey;

const EMOTION_COLUMNS: &str = "id, user_id, character, emotion, intensity, context, created_at, duration";

struct EmotionRow {
    id: String,
    user_id: String,
    character: String,
    emotion: String,
    intensity: f64,
    context: Option<String>,
    created_at: String,
    duration: i64,
}

impl EmotionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            character: row.get(2)?,
            emotion: row.get(3)?,
            intensity: row.get(4)?,
            context: row.get(5)?,
            created_at: row.get(6)?,
            duration: row.get(7)?,
        })
    }

    fn into_state(self) -> Result<EmotionalState> {
        let duration_secs = u64::try_from(self.duration)
            .map_err(|_| AnimaError::Corrupt(format!("bad emotion duration {}", self.duration)))?;
        Ok(EmotionalState {
            id: Some(self.id),
            owner: OwnerKey::new(self.user_id, self.character),
            emotion: self.emotion,
            intensity: self.intensity,
            context: self.context,
            created_at: decode_timestamp(&self.created_at)?,
            duration_secs,
        })
    }
}

/// Append one state. `expires_at` is derived here for the live-state index.
pub fn insert_emotion_row(conn: &Connection, state: &EmotionalState) -> Result<String> {
    let id = state
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
    let expires_at = state
        .expires_at()
        .ok_or_else(|| AnimaError::validation("emotion expiry is out of range"))?;
    let duration = i64::try_from(state.duration_secs)
        .map_err(|_| AnimaError::validation("emotion duration is out of range"))?;

    conn.execute(
        &format!("INSERT INTO emotional_states ({EMOTION_COLUMNS}, expires_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
        params![
            id,
            state.owner.user_id,
            state.owner.character,
            state.emotion,
            state.intensity,
            state.context,
            encode_timestamp(state.created_at),
            duration,
            encode_timestamp(expires_at),
        ],
    )?;
    Ok(id)
}

/// Rows live at `now` (`created_at <= now < expires_at`), oldest first, insertion order on ties.
pub fn live_emotions(conn: &Connection, owner: &OwnerKey, now: DateTime<Utc>) -> Result<Vec<EmotionalState>> {
    let at = encode_timestamp(now);
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMOTION_COLUMNS} FROM emotional_states \
         WHERE user_id = ?1 AND character = ?2 AND created_at <= ?3 AND expires_at > ?3 \
         ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map(params![owner.user_id, owner.character, at], EmotionRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(EmotionRow::into_state).collect()
}

/// Rows created in `[since, until]`, newest first, at most `limit`.
pub fn emotion_window(
    conn: &Connection,
    owner: &OwnerKey,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
    limit: usize,
) -> Result<Vec<EmotionalState>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMOTION_COLUMNS} FROM emotional_states \
         WHERE user_id = ?1 AND character = ?2 AND created_at >= ?3 AND created_at <= ?4 \
         ORDER BY created_at DESC, rowid DESC LIMIT ?5"
    ))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(
            params![
                owner.user_id,
                owner.character,
                encode_timestamp(since),
                encode_timestamp(until),
                limit
            ],
            EmotionRow::from_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(EmotionRow::into_state).collect()
}

/// The whole log across owners, oldest first.
pub fn all_emotions(conn: &Connection) -> Result<Vec<EmotionalState>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMOTION_COLUMNS} FROM emotional_states ORDER BY created_at, rowid"
    ))?;
    let rows = stmt
        .query_map([], EmotionRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(EmotionRow::into_state).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
    }

    fn state(emotion: &str, created_at: DateTime<Utc>, duration_secs: u64) -> EmotionalState {
        EmotionalState {
            id: None,
            owner: OwnerKey::new("u1", "airi"),
            emotion: emotion.to_string(),
            intensity: 0.5,
            context: None,
            created_at,
            duration_secs,
        }
    }

    #[test]
    fn live_rows_respect_half_open_window() {
        let conn = db::open_memory_database().unwrap();
        insert_emotion_row(&conn, &state("happy", t0(), 60)).unwrap();
        let owner = OwnerKey::new("u1", "airi");

        assert_eq!(live_emotions(&conn, &owner, t0()).unwrap().len(), 1);
        assert_eq!(live_emotions(&conn, &owner, t0() + Duration::seconds(59)).unwrap().len(), 1);
        assert!(live_emotions(&conn, &owner, t0() + Duration::seconds(60)).unwrap().is_empty());
        assert!(live_emotions(&conn, &owner, t0() - Duration::seconds(1)).unwrap().is_empty());
    }

    #[test]
    fn window_is_newest_first_and_limited() {
        let conn = db::open_memory_database().unwrap();
        for (i, emotion) in ["calm", "happy", "sad"].iter().enumerate() {
            insert_emotion_row(&conn, &state(emotion, t0() + Duration::minutes(i as i64), 3600)).unwrap();
        }
        let owner = OwnerKey::new("u1", "airi");

        let all = emotion_window(&conn, &owner, t0(), t0() + Duration::hours(1), 10).unwrap();
        let labels: Vec<&str> = all.iter().map(|s| s.emotion.as_str()).collect();
        assert_eq!(labels, vec!["sad", "happy", "calm"]);

        let limited = emotion_window(&conn, &owner, t0(), t0() + Duration::hours(1), 2).unwrap();
        assert_eq!(limited.len(), 2);

        let later = emotion_window(&conn, &owner, t0() + Duration::seconds(30), t0() + Duration::hours(1), 10).unwrap();
        assert_eq!(later.len(), 2);
    }

    #[test]
    fn zero_duration_is_never_live() {
        let conn = db::open_memory_database().unwrap();
        insert_emotion_row(&conn, &state("happy", t0(), 0)).unwrap();
        let owner = OwnerKey::new("u1", "airi");
        assert!(live_emotions(&conn, &owner, t0()).unwrap().is_empty());
    }
}
