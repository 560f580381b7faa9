//! Settings loading from disk and the environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::settings::schema::ServerSettings;
use crate::settings::validation::{validate_settings, ValidationError};

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "SCS";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load, override and validate settings.
///
/// Without a path the built-in defaults are used as the base.
pub fn load_settings(path: Option<&Path>) -> Result<ServerSettings, SettingsError> {
    let mut settings = match path {
        Some(path) => parse_settings(&fs::read_to_string(path)?)?,
        None => ServerSettings::default(),
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    validate_settings(&settings).map_err(SettingsError::Validation)?;

    Ok(settings)
}

/// Parse settings from TOML text.
pub fn parse_settings(content: &str) -> Result<ServerSettings, SettingsError> {
    Ok(toml::from_str(content)?)
}

/// Apply `SCS_*` overrides read through `lookup`.
///
/// - `SCS_HTTP_PORT`: replaces the port of the bind address
/// - `SCS_LOCAL_CONFIG_FOLDER_PATH`: replaces the documents folder
/// - `SCS_LOG_LEVEL`: replaces the log level
pub fn apply_env_overrides<F>(settings: &mut ServerSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

    if let Some(port) = var("HTTP_PORT") {
        match (port.parse::<u16>(), settings.listener.bind_address.parse::<SocketAddr>()) {
            (Ok(port), Ok(mut addr)) => {
                addr.set_port(port);
                settings.listener.bind_address = addr.to_string();
            }
            _ => tracing::warn!(port = %port, "Ignoring invalid {ENV_PREFIX}_HTTP_PORT override"),
        }
    }

    if let Some(path) = var("LOCAL_CONFIG_FOLDER_PATH") {
        settings.documents.path = path;
    }

    if let Some(level) = var("LOG_LEVEL") {
        settings.observability.log_level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let settings = parse_settings(
            r#"
            [documents]
            path = "/etc/scs"
            watch = true

            [admin]
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(settings.documents.path, "/etc/scs");
        assert!(settings.documents.watch);
        assert_eq!(settings.documents.poll_interval_secs, 2);
        assert_eq!(settings.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(settings.admin.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_settings("[listener\nbind"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SCS_HTTP_PORT", "9000"),
            ("SCS_LOCAL_CONFIG_FOLDER_PATH", "/srv/configs"),
            ("SCS_LOG_LEVEL", "debug"),
        ]);
        let mut settings = ServerSettings::default();

        apply_env_overrides(&mut settings, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(settings.documents.path, "/srv/configs");
        assert_eq!(settings.observability.log_level, "debug");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut settings = ServerSettings::default();
        apply_env_overrides(&mut settings, |name| (name == "SCS_HTTP_PORT").then(|| "http".to_string()));
        assert_eq!(settings.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_load_settings_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[timeouts]\nrequest_secs = 0\n").unwrap();

        match load_settings(Some(&path)) {
            Err(SettingsError::Validation(errors)) => assert_eq!(errors[0].field, "timeouts.request_secs"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_settings_missing_file() {
        let missing = Path::new("/definitely/not/here.toml");
        assert!(matches!(load_settings(Some(missing)), Err(SettingsError::Io(_))));
    }
}
