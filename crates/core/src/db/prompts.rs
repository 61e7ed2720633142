//! Prompt records and their lifecycle.
//!
//! A prompt is created by an upsert without an id and updated by an upsert
//! with one. Updates snapshot the content they replace (see
//! [`super::versions`]); deletes cascade to versions and usage logs in one
//! transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::tags::{decode_tags, encode_tags, normalize_tags};
use super::versions;
use super::Store;
use crate::errors::{Result, VaultError};

/// A stored prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    /// Arithmetic mean of all rated usage entries; 0.0 while unrated
    pub score_avg: f64,
    /// Number of rated usage entries
    pub score_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`Store::upsert_prompt`]: no id creates, an id updates
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPrompt {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub change_note: Option<String>,
}

pub(crate) const PROMPT_COLUMNS: &str =
    "id, title, content, tags, is_favorite, score_avg, score_count, created_at, updated_at";

pub(crate) fn row_to_prompt(row: &Row<'_>) -> rusqlite::Result<Prompt> {
    let tags_raw: String = row.get(3)?;
    Ok(Prompt {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        tags: decode_tags(&tags_raw),
        is_favorite: row.get(4)?,
        score_avg: row.get(5)?,
        score_count: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub(crate) fn fetch_prompt(conn: &Connection, id: i64) -> Result<Option<Prompt>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM prompts WHERE id = ?1",
        PROMPT_COLUMNS
    ))?;
    Ok(stmt.query_row(params![id], row_to_prompt).optional()?)
}

impl Store {
    /// Create or update a prompt.
    ///
    /// The repository accepts whatever title it is given; blank-title
    /// rejection is the command layer's job.
    pub fn upsert_prompt(&mut self, input: UpsertPrompt) -> Result<Prompt> {
        let UpsertPrompt {
            id,
            title,
            content,
            tags,
            is_favorite,
            change_note,
        } = input;

        let title = title.trim().to_string();
        let tags_json = encode_tags(&normalize_tags(tags))?;
        let note = change_note.unwrap_or_default().trim().to_string();
        let now = Utc::now();

        let tx = self.conn.transaction()?;
        let prompt = match id {
            Some(id) => update_prompt(&tx, id, &title, &content, &tags_json, is_favorite, &note, now)?,
            None => create_prompt(&tx, &title, &content, &tags_json, is_favorite, now)?,
        };
        tx.commit()?;
        Ok(prompt)
    }

    pub fn get_prompt(&self, id: i64) -> Result<Option<Prompt>> {
        fetch_prompt(&self.conn, id)
    }

    /// Remove a prompt together with its versions and usage logs.
    ///
    /// Fails with `NotFound` for an id that is not live; the cascade and
    /// the row delete are one atomic unit.
    pub fn delete_prompt(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(VaultError::NotFound { id });
        }
        tx.commit()?;
        info!(id, "deleted prompt with its versions and usage logs");
        Ok(())
    }
}

fn create_prompt(
    tx: &Transaction<'_>,
    title: &str,
    content: &str,
    tags_json: &str,
    is_favorite: bool,
    now: DateTime<Utc>,
) -> Result<Prompt> {
    tx.execute(
        "INSERT INTO prompts (title, content, tags, is_favorite, score_avg, score_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?5)",
        params![title, content, tags_json, is_favorite, now],
    )?;
    let id = tx.last_insert_rowid();
    debug!(id, "created prompt");
    fetch_prompt(tx, id)?.ok_or(VaultError::NotFound { id })
}

#[allow(clippy::too_many_arguments)]
fn update_prompt(
    tx: &Transaction<'_>,
    id: i64,
    title: &str,
    content: &str,
    tags_json: &str,
    is_favorite: bool,
    note: &str,
    now: DateTime<Utc>,
) -> Result<Prompt> {
    let previous: Option<String> = tx
        .query_row(
            "SELECT content FROM prompts WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(previous_content) = previous else {
        return Err(VaultError::NotFound { id });
    };

    tx.execute(
        "UPDATE prompts
         SET title = ?1, content = ?2, tags = ?3, is_favorite = ?4, updated_at = ?5
         WHERE id = ?6",
        params![title, content, tags_json, is_favorite, now, id],
    )?;

    // History keeps what existed before the change; metadata-only edits
    // leave no snapshot.
    if previous_content != content {
        versions::insert_version(tx, id, &previous_content, note, now)?;
        debug!(id, "updated prompt content, snapshotted previous version");
    } else {
        debug!(id, "updated prompt metadata");
    }

    fetch_prompt(tx, id)?.ok_or(VaultError::NotFound { id })
}
