//! Tag command handlers.

use serde_json::{json, Value};

use crate::db::Store;
use crate::errors::Result;

pub fn list(store: &mut Store, _args: Value) -> Result<Value> {
    Ok(json!(store.list_tags()?))
}
