//! Error type shared by the engine, the loaders and the store.
//!
//! Every variant carries the structured context needed to render a precise
//! message at the API boundary. Nothing here is retried internally: a config
//! set either resolves completely or the whole operation fails.

use std::path::PathBuf;

use crate::engine::value::{dotted, ValueKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} -> {base_kind}(base) != {extra_kind}(extra)", dotted(.path))]
    TypeMismatch {
        key: String,
        path: Vec<String>,
        base_kind: ValueKind,
        extra_kind: ValueKind,
    },

    #[error(
        "Config \"{config_name}\" under env \"{env}\" is referencing itself at \"{}\"",
        dotted(.location)
    )]
    SelfReferencingConfig {
        config_name: String,
        env: String,
        location: Vec<String>,
    },

    #[error(
        "Config \"{config_name}\" under env \"{env}\" contains a reference at \"{}\" to config \"{target}\" but it does not exist",
        dotted(.location)
    )]
    ReferencingNonexistentConfig {
        config_name: String,
        env: String,
        location: Vec<String>,
        target: String,
    },

    #[error(
        "Config \"{config_name}\" under env \"{env}\" has a circular reference at \"{}\" ({})",
        dotted(.location),
        .chain.join(" -> ")
    )]
    CircularReference {
        config_name: String,
        env: String,
        location: Vec<String>,
        chain: Vec<String>,
    },

    #[error(
        "Config \"{config_name}\" under env \"{env}\" references \"{target}.{}\" at \"{}\" but the path does not exist",
        dotted(.path),
        dotted(.location)
    )]
    UnresolvableReference {
        config_name: String,
        env: String,
        location: Vec<String>,
        target: String,
        path: Vec<String>,
    },

    #[error("Config \"{name}\" was not found")]
    ConfigNotFound { name: String },

    #[error("Env \"{env}\" of config \"{name}\" was not found")]
    EnvNotFound { name: String, env: String },

    #[error("Query parameter \"{parameter}\" is required")]
    MissingQueryParameter { parameter: &'static str },

    #[error("Config \"{name}\" is not a valid document: {source}")]
    InvalidDocument {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Short, stable label for the error kind.
    pub fn message(&self) -> &'static str {
        match self {
            Error::TypeMismatch { .. } => "Merged values have unequal types",
            Error::SelfReferencingConfig { .. } => "Configuration must not reference itself",
            Error::ReferencingNonexistentConfig { .. } => {
                "A configuration reference points to a nonexistent configuration"
            }
            Error::CircularReference { .. } => "Configuration references form a cycle",
            Error::UnresolvableReference { .. } => "A configuration reference points to a missing path",
            Error::ConfigNotFound { .. } => "Config not found",
            Error::EnvNotFound { .. } => "Config env not found",
            Error::MissingQueryParameter { .. } => "Missing query parameter",
            Error::InvalidDocument { .. } => "Config document is invalid",
            Error::Io { .. } => "Config document could not be read",
            Error::Task(_) => "Config loading was interrupted",
        }
    }

    pub(crate) fn config_not_found(name: impl Into<String>) -> Self {
        Error::ConfigNotFound { name: name.into() }
    }
}
