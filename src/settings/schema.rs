//! Server settings schema.
//!
//! All sections derive Serde traits and default every field, so an empty
//! settings file (or none at all) yields a runnable server.

use serde::{Deserialize, Serialize};

/// Root settings for the config server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerSettings {
    /// Listener configuration (bind address).
    pub listener: ListenerSettings,

    /// Where configuration documents come from.
    pub documents: DocumentSettings,

    /// Timeout configuration.
    pub timeouts: TimeoutSettings,

    /// Observability settings.
    pub observability: ObservabilitySettings,

    pub admin: AdminSettings,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Document source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Folder holding `<name>.json` documents.
    pub path: String,

    /// Reload everything when a document file changes.
    pub watch: bool,

    /// Poll interval for the file watcher in seconds.
    pub poll_interval_secs: u64,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            path: "./configs".to_string(),
            watch: false,
            poll_interval_secs: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminSettings {
    /// Bearer token required for reload and admin routes. Open when unset.
    pub api_key: Option<String>,
}
