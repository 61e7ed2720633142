//! Portable JSON import/export of the full record set.
//!
//! Export produces a self-contained document; import always creates new
//! prompts (fresh ids, no de-duplication) and is all-or-nothing: one bad
//! record rejects the whole document.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::prompts::{row_to_prompt, PROMPT_COLUMNS};
use super::tags::{encode_tags, normalize_tags};
use super::versions;
use super::Store;
use crate::errors::{Result, VaultError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportVersionItem {
    content: String,
    change_note: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPromptItem {
    title: String,
    content: String,
    tags: Vec<String>,
    is_favorite: bool,
    score_avg: f64,
    score_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    versions: Vec<ExportVersionItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload {
    exported_at: DateTime<Utc>,
    prompts: Vec<ExportPromptItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportVersionItem {
    content: String,
    #[serde(default)]
    change_note: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPromptItem {
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    score_avg: Option<f64>,
    #[serde(default)]
    score_count: Option<i64>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    versions: Option<Vec<ImportVersionItem>>,
}

/// Either the wrapped export document or a bare array of prompt items
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Wrapped { prompts: Vec<ImportPromptItem> },
    Flat(Vec<ImportPromptItem>),
}

/// Outcome of an import: the number of prompt records created
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: i64,
}

impl Store {
    /// Serialize every live prompt, including its version history, to a
    /// pretty-printed JSON document.
    pub fn export_prompts(&self) -> Result<String> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM prompts ORDER BY updated_at DESC, id DESC",
            PROMPT_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_prompt)?;

        let mut items = Vec::new();
        for row in rows {
            let prompt = row?;
            let versions = versions::fetch_versions(&self.conn, prompt.id)?
                .into_iter()
                .map(|version| ExportVersionItem {
                    content: version.content,
                    change_note: version.change_note,
                    created_at: version.created_at,
                })
                .collect();
            items.push(ExportPromptItem {
                title: prompt.title,
                content: prompt.content,
                tags: prompt.tags,
                is_favorite: prompt.is_favorite,
                score_avg: prompt.score_avg,
                score_count: prompt.score_count,
                created_at: prompt.created_at,
                updated_at: prompt.updated_at,
                versions,
            });
        }

        let payload = ExportPayload {
            exported_at: Utc::now(),
            prompts: items,
        };
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    /// Import a previously exported document.
    ///
    /// Every record becomes a brand-new prompt with a fresh id; supplied
    /// version history is re-attached to the new id. The whole document is
    /// validated up front and applied in one transaction.
    pub fn import_prompts(&mut self, json_data: &str) -> Result<ImportSummary> {
        let payload: ImportPayload = serde_json::from_str(json_data).map_err(|err| {
            VaultError::MalformedInput(format!("JSON does not match the export schema: {err}"))
        })?;
        let items = match payload {
            ImportPayload::Wrapped { prompts } => prompts,
            ImportPayload::Flat(prompts) => prompts,
        };

        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;
        }

        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let mut imported = 0_i64;
        for item in items {
            let tags_json = encode_tags(&normalize_tags(item.tags.unwrap_or_default()))?;
            let score_count = item.score_count.unwrap_or(0);
            let score_avg = if score_count == 0 {
                0.0
            } else {
                item.score_avg.unwrap_or(0.0)
            };

            tx.execute(
                "INSERT INTO prompts (title, content, tags, is_favorite, score_avg, score_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    item.title.trim(),
                    item.content,
                    tags_json,
                    item.is_favorite.unwrap_or(false),
                    score_avg,
                    score_count,
                    item.created_at.unwrap_or(now),
                    item.updated_at.unwrap_or(now),
                ],
            )?;
            let prompt_id = tx.last_insert_rowid();

            for version in item.versions.unwrap_or_default() {
                versions::insert_version(
                    &tx,
                    prompt_id,
                    &version.content,
                    version.change_note.as_deref().unwrap_or(""),
                    version.created_at.unwrap_or(now),
                )?;
            }
            imported += 1;
        }
        tx.commit()?;
        info!(imported, "imported prompt records");

        Ok(ImportSummary { imported })
    }
}

fn validate_item(index: usize, item: &ImportPromptItem) -> Result<()> {
    if item.title.trim().is_empty() {
        return Err(VaultError::MalformedInput(format!(
            "prompt record {index} has a blank title"
        )));
    }
    if item.content.trim().is_empty() {
        return Err(VaultError::MalformedInput(format!(
            "prompt record {index} has blank content"
        )));
    }
    if item.score_count.unwrap_or(0) < 0 {
        return Err(VaultError::MalformedInput(format!(
            "prompt record {index} has a negative scoreCount"
        )));
    }
    Ok(())
}
