//! PromptVault core: the data and query engine behind a local prompt
//! library.
//!
//! The surrounding shell (window chrome, keyboard capture, clipboard,
//! file pickers) is thin platform glue; everything with real invariants
//! lives here:
//! - Durable prompt storage with append-only version history
//! - A derived tag index and a usage-log-driven score per prompt
//! - A search/filter/sort query engine
//! - A `{{ variable }}` extractor/renderer
//! - A portable JSON import/export codec
//!
//! ## Architecture
//!
//! - **[`db`]**: SQLite storage behind a stateless [`Store`] service
//!   object; every multi-step mutation is one transaction.
//! - **[`commands`]**: the fixed command contract the shell calls —
//!   JSON arguments in, JSON values out, dispatched by name.
//! - **[`template`]**: pure variable extraction and rendering.
//! - **[`errors`]**: the [`VaultError`] taxonomy shared by all of the
//!   above.
//!
//! Single-process, single-writer: the shell issues one command at a time
//! and the core performs no internal concurrency.

pub mod commands;
pub mod db;
pub mod errors;
pub mod template;

pub use db::Store;
pub use errors::{Result, VaultError};
