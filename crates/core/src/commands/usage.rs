//! Usage log command handlers.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, PromptIdArgs};
use crate::db::usage::LogUsage;
use crate::db::Store;
use crate::errors::Result;

#[derive(Debug, Deserialize)]
struct LogArgs {
    input: LogUsage,
}

pub fn log(store: &mut Store, args: Value) -> Result<Value> {
    let LogArgs { input } = parse_args("log_prompt_usage", args)?;
    store.log_usage(input)?;
    Ok(json!({ "success": true }))
}

pub fn list(store: &mut Store, args: Value) -> Result<Value> {
    let PromptIdArgs { prompt_id } = parse_args("list_prompt_usage", args)?;
    Ok(json!(store.list_usage(prompt_id)?))
}
