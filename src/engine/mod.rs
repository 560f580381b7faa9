//! Configuration composition and reference-resolution engine.
//!
//! # Data Flow
//! ```text
//! raw Document {default, shards}
//!     → composer.rs (per-env trees, using merge.rs)
//!     → unresolved Config (one per document)
//!     → resolver.rs (against the full unresolved set)
//!     → resolved Config set
//! ```
//!
//! # Design Decisions
//! - Everything here is pure and synchronous: no I/O, no shared mutable state
//! - Inputs are borrowed, outputs are freshly owned trees
//! - The value tree is `serde_json::Value`; kinds are compared through `ValueKind`

pub mod composer;
pub mod merge;
pub mod model;
pub mod resolver;
pub mod value;

pub use composer::{compose, compose_document};
pub use merge::{merge, merge_into};
pub use model::{Config, Document, EnvConfig, Shard, DEFAULT_ENV};
pub use resolver::{resolve_all, ConfigReference};
pub use value::{Map, Value, ValueKind};
