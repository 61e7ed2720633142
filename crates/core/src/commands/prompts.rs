//! Prompt command handlers.
//!
//! Thin wrappers over the store: deserialize arguments, enforce the
//! caller-side input rules (blank titles and content never reach the
//! repository), and shape the JSON reply.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, PromptIdArgs};
use crate::db::prompts::UpsertPrompt;
use crate::db::query::ListQuery;
use crate::db::Store;
use crate::errors::{Result, VaultError};
use crate::template;

pub fn list(store: &mut Store, args: Value) -> Result<Value> {
    let query: ListQuery = parse_args("list_prompts", args)?;
    Ok(json!(store.list_prompts(&query)?))
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: i64,
}

pub fn get(store: &mut Store, args: Value) -> Result<Value> {
    let IdArgs { id } = parse_args("get_prompt", args)?;
    match store.get_prompt(id)? {
        Some(prompt) => Ok(json!(prompt)),
        None => Ok(Value::Null),
    }
}

#[derive(Debug, Deserialize)]
struct UpsertArgs {
    input: UpsertPrompt,
}

pub fn upsert(store: &mut Store, args: Value) -> Result<Value> {
    let UpsertArgs { input } = parse_args("upsert_prompt", args)?;
    if input.title.trim().is_empty() {
        return Err(invalid("upsert_prompt", "title must not be empty"));
    }
    if input.content.trim().is_empty() {
        return Err(invalid("upsert_prompt", "content must not be empty"));
    }
    Ok(json!(store.upsert_prompt(input)?))
}

pub fn delete(store: &mut Store, args: Value) -> Result<Value> {
    let IdArgs { id } = parse_args("delete_prompt", args)?;
    store.delete_prompt(id)?;
    Ok(json!({ "success": true }))
}

pub fn list_versions(store: &mut Store, args: Value) -> Result<Value> {
    let PromptIdArgs { prompt_id } = parse_args("list_prompt_versions", args)?;
    Ok(json!(store.list_versions(prompt_id)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderArgs {
    prompt_id: i64,
    #[serde(default)]
    input_vars: BTreeMap<String, String>,
}

/// Render a prompt's content against the supplied variables without
/// logging anything; also reports which variables the content declares.
pub fn render(store: &mut Store, args: Value) -> Result<Value> {
    let RenderArgs {
        prompt_id,
        input_vars,
    } = parse_args("render_prompt", args)?;
    let Some(prompt) = store.get_prompt(prompt_id)? else {
        return Err(VaultError::NotFound { id: prompt_id });
    };

    let variables = template::extract_variables(&prompt.content);
    let output_text = template::render_template(&prompt.content, &input_vars);
    Ok(json!({ "outputText": output_text, "variables": variables }))
}

fn invalid(command: &str, reason: &str) -> VaultError {
    VaultError::InvalidArgs {
        command: command.to_string(),
        reason: reason.to_string(),
    }
}
