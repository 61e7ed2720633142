//! SQLite-backed storage for the prompt library.
//!
//! `Store` is a stateless service object over a single connection: every
//! piece of state lives in the database file, nothing at module level.
//! Mutating operations take `&mut self` (single-writer model) and wrap
//! multi-step changes in a transaction, so a crash or an interleaved read
//! never observes a half-applied mutation.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::errors::Result;

pub mod prompts;
pub mod query;
pub mod schema;
pub mod tags;
pub mod transfer;
pub mod usage;
pub mod versions;


/// Handle to the prompt database
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database at the given path, creating file and parent
    /// directories as needed and applying the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let store = Self::init(Connection::open(path)?)?;
        debug!(path = %path.display(), "opened prompt store");
        Ok(store)
    }

    /// Open an ephemeral in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }

    /// Default database location under the platform data directory
    pub fn default_db_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("promptvault").join("promptvault.db"))
    }
}
