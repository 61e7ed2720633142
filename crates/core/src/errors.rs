//! Error types for the PromptVault core.
//!
//! The core never retries internally; every failure propagates to the
//! presentation layer with a message it can display as-is.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Main error type for the PromptVault core
#[derive(Debug, Error)]
pub enum VaultError {
    /// Command not found in registry
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid command arguments
    #[error("Invalid arguments for command '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// Operation referenced a prompt id that is not live
    #[error("Prompt not found: {id}")]
    NotFound { id: i64 },

    /// Import document or field fails schema validation
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Underlying SQLite store could not complete a read/write
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Get user-friendly error message for display in the shell
    pub fn user_message(&self) -> String {
        match self {
            VaultError::CommandNotFound(cmd) => {
                format!("Command '{}' is not part of the PromptVault contract.", cmd)
            },
            VaultError::InvalidArgs { command, reason } => {
                format!("Invalid arguments for '{}': {}", command, reason)
            },
            VaultError::NotFound { id } => {
                format!("Prompt {} does not exist (it may have been deleted).", id)
            },
            VaultError::MalformedInput(reason) => {
                format!("The provided data is invalid: {}", reason)
            },
            VaultError::Storage(err) => {
                format!("The prompt database reported an error: {}", err)
            },
            _ => self.to_string(),
        }
    }

    /// Get error category for logging/telemetry
    pub fn category(&self) -> &'static str {
        match self {
            VaultError::CommandNotFound(_) => "command",
            VaultError::InvalidArgs { .. } => "arguments",
            VaultError::NotFound { .. } => "not_found",
            VaultError::MalformedInput(_) => "malformed_input",
            VaultError::Storage(_) => "storage",
            VaultError::Serde(_) => "serialization",
            VaultError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "Prompt not found: 42");
    }

    #[test]
    fn test_user_message() {
        let err = VaultError::NotFound { id: 42 };
        assert!(err.user_message().contains("42"));
        assert!(err.user_message().contains("deleted"));
    }

    #[test]
    fn test_error_category() {
        assert_eq!(VaultError::NotFound { id: 1 }.category(), "not_found");
        assert_eq!(
            VaultError::InvalidArgs {
                command: "upsert_prompt".to_string(),
                reason: "bad".to_string(),
            }
            .category(),
            "arguments"
        );
        assert_eq!(
            VaultError::MalformedInput("no title".to_string()).category(),
            "malformed_input"
        );
    }
}
