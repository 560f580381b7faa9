//! Server settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize, SCS_* env overrides)
//!     → validation.rs (semantic checks)
//!     → ServerSettings (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the server runs without a settings file
//! - Validation separates syntactic (serde) from semantic checks
//! - Changing settings requires a restart; documents are what hot-reload

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError};
pub use schema::{AdminSettings, DocumentSettings, ListenerSettings, ObservabilitySettings, ServerSettings, TimeoutSettings};
