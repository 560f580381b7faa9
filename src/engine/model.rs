//! Configuration data model.
//!
//! `Config` and `EnvConfig` are immutable once built. Every transformation
//! (composition, resolution) produces new instances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::value::Map;

/// Name of the environment every config carries.
pub const DEFAULT_ENV: &str = "default";

/// One environment's content tree for one named config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvConfig {
    name: String,
    env: String,
    content: Map,
}

impl EnvConfig {
    pub fn new(name: impl Into<String>, env: impl Into<String>, content: Map) -> Self {
        Self {
            name: name.into(),
            env: env.into(),
            content,
        }
    }

    /// Name of the owning config.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn content(&self) -> &Map {
        &self.content
    }
}

/// A named document's full set of per-environment trees.
///
/// Always contains exactly one `"default"` environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    name: String,
    envs: BTreeMap<String, EnvConfig>,
}

impl Config {
    /// Create a config holding only the default environment.
    pub fn new(name: impl Into<String>, default: Map) -> Self {
        let name = name.into();
        let mut envs = BTreeMap::new();
        envs.insert(
            DEFAULT_ENV.to_string(),
            EnvConfig::new(name.clone(), DEFAULT_ENV, default),
        );
        Self { name, envs }
    }

    /// Add (or replace) an environment.
    pub fn with_env(mut self, env: impl Into<String>, content: Map) -> Self {
        let env = env.into();
        let env_config = EnvConfig::new(self.name.clone(), env.clone(), content);
        self.envs.insert(env, env_config);
        self
    }

    /// Rebuild a config from already-constructed environments.
    ///
    /// Callers guarantee the default environment is part of `envs`.
    pub(crate) fn from_envs(name: String, envs: BTreeMap<String, EnvConfig>) -> Self {
        debug_assert!(envs.contains_key(DEFAULT_ENV));
        Self { name, envs }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self, env: &str) -> Option<&EnvConfig> {
        self.envs.get(env)
    }

    /// The environment matching `env`, or the default one when absent.
    pub fn env_or_default(&self, env: &str) -> Option<&EnvConfig> {
        self.envs.get(env).or_else(|| self.envs.get(DEFAULT_ENV))
    }

    pub fn envs(&self) -> impl Iterator<Item = &EnvConfig> {
        self.envs.values()
    }

    pub fn env_names(&self) -> impl Iterator<Item = &str> {
        self.envs.keys().map(String::as_str)
    }
}

/// Raw document as stored by a loader.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default)]
    pub default: Map,

    #[serde(default)]
    pub shards: Vec<Shard>,
}

/// Override fragment applied to a set of environments.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Shard {
    pub envs: Vec<String>,
    pub content: Map,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> Map {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_config_has_default_env() {
        let config = Config::new("db", map(json!({"host": "localhost"})));
        let default = config.env(DEFAULT_ENV).unwrap();
        assert_eq!(default.name(), "db");
        assert_eq!(default.env(), DEFAULT_ENV);
        assert_eq!(config.env_names().collect::<Vec<_>>(), vec![DEFAULT_ENV]);
    }

    #[test]
    fn test_env_or_default_falls_back() {
        let config = Config::new("db", map(json!({"a": 1}))).with_env("prod", map(json!({"a": 2})));
        assert_eq!(config.env_or_default("prod").unwrap().content()["a"], json!(2));
        assert_eq!(config.env_or_default("staging").unwrap().env(), DEFAULT_ENV);
    }

    #[test]
    fn test_document_fields_are_optional() {
        let doc: Document = serde_json::from_value(json!({})).unwrap();
        assert!(doc.default.is_empty());
        assert!(doc.shards.is_empty());

        let doc: Document = serde_json::from_value(json!({
            "default": {"k": "v"},
            "shards": [{"envs": ["e1"], "content": {"k": "w"}}]
        }))
        .unwrap();
        assert_eq!(doc.shards[0].envs, vec!["e1"]);
    }
}
