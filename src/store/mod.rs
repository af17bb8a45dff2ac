//! Context Store
//!
//! Persistence boundary for the context list. The core only needs two operations,
//! load everything and save everything; the JSON file store adds legacy migration
//! and atomic writes on top.

pub mod json;
pub mod legacy;
pub mod memory;

pub use json::JsonContextStore;
pub use memory::MemoryContextStore;

use crate::context::Context;
use crate::error::StorageError;

/// Context Store interface
pub trait ContextStore: Send + Sync {
    /// Load every context in display order. A missing or undecodable store yields
    /// an empty list; only I/O failures are errors.
    fn load_all(&self) -> Result<Vec<Context>, StorageError>;

    /// Replace the stored list with `contexts`.
    fn save_all(&self, contexts: &[Context]) -> Result<(), StorageError>;
}
