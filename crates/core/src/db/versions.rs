//! Append-only prompt version history.
//!
//! A version row is written exactly once, at the moment an upsert replaces
//! a prompt's content, and carries the content that existed before the
//! edit. Rows are never mutated or reordered.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::Store;
use crate::errors::Result;

/// Immutable snapshot of a prompt's pre-edit content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptVersion {
    pub id: i64,
    pub prompt_id: i64,
    pub content: String,
    /// Free-text annotation supplied with the edit; may be empty
    pub change_note: String,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn insert_version(
    conn: &Connection,
    prompt_id: i64,
    content: &str,
    change_note: &str,
    created_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO prompt_versions (prompt_id, content, change_note, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![prompt_id, content, change_note, created_at],
    )?;
    Ok(())
}

pub(crate) fn fetch_versions(conn: &Connection, prompt_id: i64) -> Result<Vec<PromptVersion>> {
    let mut stmt = conn.prepare(
        "SELECT id, prompt_id, content, change_note, created_at
         FROM prompt_versions
         WHERE prompt_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![prompt_id], |row| {
        Ok(PromptVersion {
            id: row.get(0)?,
            prompt_id: row.get(1)?,
            content: row.get(2)?,
            change_note: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;

    let mut versions = Vec::new();
    for row in rows {
        versions.push(row?);
    }
    Ok(versions)
}

impl Store {
    /// Version history for a prompt, newest first.
    ///
    /// An id with no live prompt yields an empty list, not an error.
    pub fn list_versions(&self, prompt_id: i64) -> Result<Vec<PromptVersion>> {
        fetch_versions(&self.conn, prompt_id)
    }
}
