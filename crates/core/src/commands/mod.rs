//! Command registry and dispatch system
//!
//! The presentation layer drives the core exclusively through named
//! commands carrying JSON arguments; each command maps to exactly one store
//! operation. Handlers are plain functions over `(&mut Store, Value)` —
//! the store handle is threaded through instead of living in a global, so
//! the core stays stateless between calls.
//!
//! ## Adding a new command
//!
//! 1. Create a handler: `pub fn my_command(store: &mut Store, args: Value) -> Result<Value>`
//! 2. Register it in `REGISTRY` under its contract name
//! 3. Add tests for the command

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::db::Store;
use crate::errors::{Result, VaultError};

mod prompts;
mod tags;
mod transfer;
mod usage;

/// Type alias for command handler functions
pub type CommandHandler = fn(&mut Store, Value) -> Result<Value>;

/// Static command registry
///
/// Maps contract command names to handler functions. Initialized lazily on
/// first access.
static REGISTRY: Lazy<HashMap<&'static str, CommandHandler>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, CommandHandler> = HashMap::new();

    // Health check
    map.insert("ping", ping as CommandHandler);

    // Prompt repository + query engine
    map.insert("list_prompts", prompts::list as CommandHandler);
    map.insert("get_prompt", prompts::get as CommandHandler);
    map.insert("upsert_prompt", prompts::upsert as CommandHandler);
    map.insert("delete_prompt", prompts::delete as CommandHandler);
    map.insert("list_prompt_versions", prompts::list_versions as CommandHandler);
    map.insert("render_prompt", prompts::render as CommandHandler);

    // Tag index
    map.insert("list_tags", tags::list as CommandHandler);

    // Usage log
    map.insert("log_prompt_usage", usage::log as CommandHandler);
    map.insert("list_prompt_usage", usage::list as CommandHandler);

    // Import/export
    map.insert("export_prompts_json", transfer::export as CommandHandler);
    map.insert("import_prompts_json", transfer::import as CommandHandler);

    map
});

/// Dispatch a command by name
///
/// Looks up the command in the registry and executes it against the given
/// store with the provided arguments.
pub fn dispatch(store: &mut Store, command: &str, args: Value) -> Result<Value> {
    match REGISTRY.get(command) {
        Some(handler) => handler(store, args),
        None => Err(VaultError::CommandNotFound(command.to_string())),
    }
}

/// List all available commands
///
/// Returns a sorted list of all registered command names.
pub fn list_commands() -> Vec<String> {
    let mut commands: Vec<String> = REGISTRY.keys().map(|&k| k.to_string()).collect();
    commands.sort();
    commands
}

/// Deserialize command arguments, tolerating `null` as an empty object
pub(crate) fn parse_args<T: DeserializeOwned>(command: &str, args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|err| VaultError::InvalidArgs {
        command: command.to_string(),
        reason: err.to_string(),
    })
}

/// Arguments carrying only a prompt id, shared by several commands
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptIdArgs {
    pub prompt_id: i64,
}

// ============================================================================
// Test Commands
// ============================================================================

/// Ping command - simple test to verify command dispatch works
///
/// Returns the input arguments with an added "pong" field.
fn ping(_store: &mut Store, args: Value) -> Result<Value> {
    let mut result = match args {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    result.insert("pong".to_string(), Value::Bool(true));
    Ok(Value::Object(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    // ========================================
    // dispatch() tests
    // ========================================

    #[test]
    fn test_dispatch_ping() {
        let mut store = store();
        let result = dispatch(&mut store, "ping", json!({"message": "hello"})).unwrap();
        assert_eq!(result["pong"], json!(true));
        assert_eq!(result["message"], json!("hello"));
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let mut store = store();
        let result = dispatch(&mut store, "unknown.command", json!({}));
        match result {
            Err(VaultError::CommandNotFound(cmd)) => assert_eq!(cmd, "unknown.command"),
            other => panic!("Expected CommandNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dispatch_with_null_args() {
        let mut store = store();
        let result = dispatch(&mut store, "ping", json!(null)).unwrap();
        assert_eq!(result["pong"], json!(true));

        let result = dispatch(&mut store, "list_prompts", json!(null)).unwrap();
        assert_eq!(result, json!([]));
    }

    // ========================================
    // list_commands() tests
    // ========================================

    #[test]
    fn test_list_commands_covers_the_contract() {
        let commands = list_commands();
        for name in [
            "list_prompts",
            "list_tags",
            "get_prompt",
            "list_prompt_versions",
            "upsert_prompt",
            "delete_prompt",
            "log_prompt_usage",
            "export_prompts_json",
            "import_prompts_json",
        ] {
            assert!(commands.contains(&name.to_string()), "missing {name}");
        }
    }

    #[test]
    fn test_list_commands_is_sorted() {
        let commands = list_commands();
        let mut sorted = commands.clone();
        sorted.sort();
        assert_eq!(commands, sorted);
    }

    // ========================================
    // parse_args() tests
    // ========================================

    #[test]
    fn test_parse_args_reports_the_command() {
        let result: Result<PromptIdArgs> = parse_args("list_prompt_versions", json!({"promptId": "nope"}));
        match result {
            Err(VaultError::InvalidArgs { command, .. }) => {
                assert_eq!(command, "list_prompt_versions");
            },
            other => panic!("Expected InvalidArgs, got {:?}", other.map(|_| ())),
        }
    }
}
