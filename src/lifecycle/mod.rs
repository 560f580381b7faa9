//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → Loader → Store → initial reload_all → serve
//!
//! Reload (reload.rs):
//!     SIGHUP / document watcher → ReloadRequest → store.reload_all()
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → server drains → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: the initial load must succeed before traffic is accepted
//! - Later reload failures are logged and the previous snapshot stays served

pub mod reload;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use reload::{run_reload_loop, ReloadRequest};
pub use shutdown::Shutdown;
pub use startup::bootstrap;
