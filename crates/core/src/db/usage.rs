//! Usage logging and the per-prompt running score.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Store;
use crate::errors::{Result, VaultError};

/// Immutable record of one render-and-use event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLogEntry {
    pub id: i64,
    pub prompt_id: i64,
    /// Variable name to the value supplied at render time
    pub input_vars: BTreeMap<String, String>,
    /// The fully rendered text that was produced
    pub output_text: String,
    /// Integer in `[1,5]`; `None` means not rated
    pub rating: Option<i64>,
    pub used_at: DateTime<Utc>,
}

/// Input for [`Store::log_usage`]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogUsage {
    pub prompt_id: i64,
    #[serde(default)]
    pub input_vars: BTreeMap<String, String>,
    pub output_text: String,
    #[serde(default)]
    pub rating: Option<i64>,
}

impl Store {
    /// Append a usage entry; a rated entry also folds its rating into the
    /// prompt's running mean. Insert and score update are one atomic unit.
    ///
    /// Logging never refreshes the prompt's `updated_at` — usage is not an
    /// edit.
    pub fn log_usage(&mut self, input: LogUsage) -> Result<UsageLogEntry> {
        if let Some(rating) = input.rating {
            if !(1..=5).contains(&rating) {
                return Err(VaultError::MalformedInput(format!(
                    "rating must be between 1 and 5, got {rating}"
                )));
            }
        }

        let now = Utc::now();
        let input_vars_json = serde_json::to_string(&input.input_vars)?;

        let tx = self.conn.transaction()?;
        let score: Option<(f64, i64)> = tx
            .query_row(
                "SELECT score_avg, score_count FROM prompts WHERE id = ?1",
                params![input.prompt_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((score_avg, score_count)) = score else {
            return Err(VaultError::NotFound { id: input.prompt_id });
        };

        tx.execute(
            "INSERT INTO usage_logs (prompt_id, input_vars, output_text, rating, used_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                input.prompt_id,
                input_vars_json,
                input.output_text,
                input.rating,
                now
            ],
        )?;
        let entry_id = tx.last_insert_rowid();

        if let Some(rating) = input.rating {
            // Running mean over rated entries only
            let next_count = score_count + 1;
            let next_avg = (score_avg * score_count as f64 + rating as f64) / next_count as f64;
            tx.execute(
                "UPDATE prompts SET score_avg = ?1, score_count = ?2 WHERE id = ?3",
                params![next_avg, next_count, input.prompt_id],
            )?;
        }
        tx.commit()?;
        debug!(
            prompt_id = input.prompt_id,
            rated = input.rating.is_some(),
            "logged prompt usage"
        );

        Ok(UsageLogEntry {
            id: entry_id,
            prompt_id: input.prompt_id,
            input_vars: input.input_vars,
            output_text: input.output_text,
            rating: input.rating,
            used_at: now,
        })
    }

    /// Usage history for a prompt, newest first; empty when the id is
    /// unknown.
    pub fn list_usage(&self, prompt_id: i64) -> Result<Vec<UsageLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, prompt_id, input_vars, output_text, rating, used_at
             FROM usage_logs
             WHERE prompt_id = ?1
             ORDER BY used_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![prompt_id], |row| {
            let input_vars_raw: String = row.get(2)?;
            Ok(UsageLogEntry {
                id: row.get(0)?,
                prompt_id: row.get(1)?,
                input_vars: serde_json::from_str(&input_vars_raw).unwrap_or_default(),
                output_text: row.get(3)?,
                rating: row.get(4)?,
                used_at: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
