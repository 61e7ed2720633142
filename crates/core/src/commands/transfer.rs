//! Import/export command handlers.

use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_args;
use crate::db::Store;
use crate::errors::Result;

pub fn export(store: &mut Store, _args: Value) -> Result<Value> {
    Ok(Value::String(store.export_prompts()?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportArgs {
    json_data: String,
}

pub fn import(store: &mut Store, args: Value) -> Result<Value> {
    let ImportArgs { json_data } = parse_args("import_prompts_json", args)?;
    Ok(json!(store.import_prompts(&json_data)?))
}
