//! Tag normalization and the derived tag index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Store;
use crate::errors::Result;

/// A tag name with the number of live prompts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub count: i64,
}

/// Trim tags, drop empties, and dedup case-insensitively.
///
/// The first-seen casing and the original order survive; `["x", "X"]`
/// collapses to `["x"]`.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut normalized = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

pub(crate) fn encode_tags(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

pub(crate) fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

impl Store {
    /// Recompute the tag index from all live prompts.
    ///
    /// Prompts are scanned in id order so a tag's canonical casing is the
    /// first casing ever stored. Sorted by count descending, then name
    /// ascending.
    pub fn list_tags(&self) -> Result<Vec<TagInfo>> {
        let mut stmt = self.conn.prepare("SELECT tags FROM prompts ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        // lowercase key -> (canonical casing, count), insertion order kept
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, (String, i64)> = HashMap::new();
        for row in rows {
            for tag in decode_tags(&row?) {
                let key = tag.to_lowercase();
                match counts.get_mut(&key) {
                    Some((_, count)) => *count += 1,
                    None => {
                        counts.insert(key.clone(), (tag, 1));
                        order.push(key);
                    },
                }
            }
        }

        let mut infos: Vec<TagInfo> = order
            .into_iter()
            .filter_map(|key| counts.remove(&key))
            .map(|(name, count)| TagInfo { name, count })
            .collect();
        infos.sort_by(|left, right| {
            right
                .count
                .cmp(&left.count)
                .then_with(|| left.name.to_lowercase().cmp(&right.name.to_lowercase()))
                .then_with(|| left.name.cmp(&right.name))
        });
        Ok(infos)
    }
}
