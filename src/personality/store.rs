//! Row access for `personality_traits`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use super::TraitValue;
use crate::db::{decode_timestamp, encode_timestamp};
use crate::error::Result;
use crate::memory::types::OwnerKey;

/// Insert or overwrite one trait value.
pub fn upsert_trait(
    conn: &Connection,
    owner: &OwnerKey,
    trait_name: &str,
    value: f64,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO personality_traits (user_id, character, trait_name, trait_value, last_updated) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(user_id, character, trait_name) DO UPDATE SET \
         trait_value = excluded.trait_value, last_updated = excluded.last_updated",
        params![owner.user_id, owner.character, trait_name, value, encode_timestamp(now)],
    )?;
    Ok(())
}

/// All stored traits for the owner, by name.
pub fn query_traits(conn: &Connection, owner: &OwnerKey) -> Result<Vec<(String, TraitValue)>> {
    let mut stmt = conn.prepare(
        "SELECT trait_name, trait_value, last_updated FROM personality_traits \
         WHERE user_id = ?1 AND character = ?2 ORDER BY trait_name",
    )?;
    let rows = stmt
        .query_map(params![owner.user_id, owner.character], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(name, value, last_updated)| {
            Ok((
                name,
                TraitValue {
                    value,
                    last_updated: decode_timestamp(&last_updated)?,
                },
            ))
        })
        .collect()
}

/// Stored value of one trait, if any.
pub fn trait_value(conn: &Connection, owner: &OwnerKey, trait_name: &str) -> Result<Option<f64>> {
    let value = conn
        .query_row(
            "SELECT trait_value FROM personality_traits \
             WHERE user_id = ?1 AND character = ?2 AND trait_name = ?3",
            params![owner.user_id, owner.character, trait_name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn has_traits(conn: &Connection, owner: &OwnerKey) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM personality_traits WHERE user_id = ?1 AND character = ?2)",
        params![owner.user_id, owner.character],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// A trait row with its owner, for dumps.
#[derive(Debug, Clone, Serialize)]
pub struct StoredTrait {
    pub owner: OwnerKey,
    pub trait_name: String,
    pub value: f64,
    pub last_updated: String,
}

pub fn all_traits(conn: &Connection) -> Result<Vec<StoredTrait>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, character, trait_name, trait_value, last_updated FROM personality_traits \
         ORDER BY user_id, character, trait_name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredTrait {
                owner: OwnerKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                trait_name: row.get(2)?,
                value: row.get(3)?,
                last_updated: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
