//! Document loading subsystem.
//!
//! # Responsibilities
//! - Read raw documents keyed by name
//! - Compose them into unresolved `Config`s
//!
//! # Design Decisions
//! - `Loader` is a plain trait object so the store does not care where
//!   documents come from (local folder, in-memory fixture, ...)
//! - Loading is synchronous; async callers move it onto a blocking thread

pub mod local_folder;
pub mod memory;
pub mod watcher;

use crate::engine::Config;
use crate::error::Result;

pub use local_folder::LocalFolderLoader;
pub use memory::InMemoryLoader;
pub use watcher::DocumentWatcher;

/// Source of named configuration documents.
pub trait Loader: Send + Sync + std::fmt::Debug {
    /// Load and compose a single document.
    ///
    /// Fails with `Error::ConfigNotFound` when no document has that name.
    fn load(&self, name: &str) -> Result<Config>;

    /// Load and compose every available document.
    fn load_all(&self) -> Result<Vec<Config>>;
}
