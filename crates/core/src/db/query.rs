//! Filtered, sorted prompt listing.
//!
//! Matching happens in Rust over a full table scan: the store is small and
//! local, and SQL LIKE can express neither case-insensitive matching beyond
//! ASCII nor exact tag membership over a JSON column.

use serde::Deserialize;

use super::prompts::{row_to_prompt, Prompt, PROMPT_COLUMNS};
use super::Store;
use crate::errors::Result;

/// Sort order for [`Store::list_prompts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Most recently updated first (the default)
    #[default]
    Updated,
    /// Highest running score first; unrated prompts after all rated ones
    Score,
    /// Most recently created first
    Created,
}

/// Listing request; filters AND-compose, blank filter values are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl Store {
    /// All live prompts matching the query, in the requested order.
    pub fn list_prompts(&self, query: &ListQuery) -> Result<Vec<Prompt>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM prompts", PROMPT_COLUMNS))?;
        let rows = stmt.query_map([], row_to_prompt)?;

        let mut prompts = Vec::new();
        for row in rows {
            prompts.push(row?);
        }

        if let Some(needle) = trimmed(query.search.as_deref()) {
            let needle = needle.to_lowercase();
            prompts.retain(|prompt| matches_search(prompt, &needle));
        }
        if let Some(tag) = trimmed(query.tag.as_deref()) {
            let tag = tag.to_lowercase();
            prompts.retain(|prompt| has_tag(prompt, &tag));
        }

        sort_prompts(&mut prompts, query.sort_by);
        Ok(prompts)
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive substring over title, content, or any tag
fn matches_search(prompt: &Prompt, needle: &str) -> bool {
    prompt.title.to_lowercase().contains(needle)
        || prompt.content.to_lowercase().contains(needle)
        || prompt.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Case-insensitive exact membership in the tag set
fn has_tag(prompt: &Prompt, tag: &str) -> bool {
    prompt.tags.iter().any(|candidate| candidate.to_lowercase() == tag)
}

fn sort_prompts(prompts: &mut [Prompt], sort_by: SortBy) {
    match sort_by {
        SortBy::Updated => prompts.sort_by(|left, right| {
            right
                .updated_at
                .cmp(&left.updated_at)
                .then_with(|| right.id.cmp(&left.id))
        }),
        SortBy::Created => prompts.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        }),
        SortBy::Score => prompts.sort_by(|left, right| {
            let left_rated = left.score_count > 0;
            let right_rated = right.score_count > 0;
            right_rated
                .cmp(&left_rated)
                .then_with(|| right.score_avg.total_cmp(&left.score_avg))
                .then_with(|| right.updated_at.cmp(&left.updated_at))
                .then_with(|| right.id.cmp(&left.id))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn prompt(id: i64, title: &str, content: &str, tags: &[&str]) -> Prompt {
        Prompt {
            id,
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_favorite: false,
            score_avg: 0.0,
            score_count: 0,
            created_at: Utc.timestamp_opt(1_000 + id, 0).unwrap(),
            updated_at: Utc.timestamp_opt(2_000 + id, 0).unwrap(),
        }
    }

    // ========================================
    // Filter tests
    // ========================================

    #[test]
    fn test_search_matches_title_content_and_tags() {
        let by_title = prompt(1, "Code Review", "x", &[]);
        let by_content = prompt(2, "x", "please REVIEW this", &[]);
        let by_tag = prompt(3, "x", "y", &["review"]);
        let none = prompt(4, "x", "y", &["z"]);

        for candidate in [&by_title, &by_content, &by_tag] {
            assert!(matches_search(candidate, "review"), "id {}", candidate.id);
        }
        assert!(!matches_search(&none, "review"));
    }

    #[test]
    fn test_tag_filter_is_exact_not_substring() {
        let tagged = prompt(1, "t", "c", &["Rust"]);
        assert!(has_tag(&tagged, "rust"));
        assert!(!has_tag(&tagged, "rus"));
        assert!(!has_tag(&tagged, "rust-lang"));
    }

    // ========================================
    // Sort tests
    // ========================================

    #[test]
    fn test_sort_updated_descending() {
        let mut prompts = vec![prompt(1, "a", "c", &[]), prompt(3, "b", "c", &[]), prompt(2, "c", "c", &[])];
        sort_prompts(&mut prompts, SortBy::Updated);
        let ids: Vec<i64> = prompts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_score_ranks_unrated_last() {
        let mut low = prompt(1, "low", "c", &[]);
        low.score_avg = 1.5;
        low.score_count = 2;
        let mut high = prompt(2, "high", "c", &[]);
        high.score_avg = 4.5;
        high.score_count = 1;
        // Fresh prompt: meaningless default average, must still sort last
        let unrated = prompt(3, "unrated", "c", &[]);

        let mut prompts = vec![unrated, low, high];
        sort_prompts(&mut prompts, SortBy::Score);
        let ids: Vec<i64> = prompts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_score_ties_break_by_updated_at() {
        let mut older = prompt(1, "older", "c", &[]);
        older.score_avg = 3.0;
        older.score_count = 1;
        let mut newer = prompt(2, "newer", "c", &[]);
        newer.score_avg = 3.0;
        newer.score_count = 4;

        let mut prompts = vec![older, newer];
        sort_prompts(&mut prompts, SortBy::Score);
        let ids: Vec<i64> = prompts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    // ========================================
    // Deserialization tests
    // ========================================

    #[test]
    fn test_sort_by_parses_contract_values() {
        let query: ListQuery =
            serde_json::from_value(serde_json::json!({"sortBy": "score"})).unwrap();
        assert_eq!(query.sort_by, SortBy::Score);

        let query: ListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.sort_by, SortBy::Updated);
    }

    #[test]
    fn test_unknown_sort_by_is_rejected() {
        let result =
            serde_json::from_value::<ListQuery>(serde_json::json!({"sortBy": "relevance"}));
        assert!(result.is_err());
    }
}
