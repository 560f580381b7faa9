//! Cross-config reference resolution.
//!
//! A string value is a reference iff the whole string matches
//! `${name(.segment)*}`. The first segment names the target config, the rest
//! is a path into the target environment's content. The target environment is
//! the referencing environment when the target has it, otherwise the target's
//! default environment.
//!
//! # Design Decisions
//! - Lookups always go against the original, unresolved config set, so the
//!   order in which configs are resolved does not matter
//! - Fetched values are resolved recursively in the same pass; errors keep
//!   reporting the location and owner of the original reference
//! - List elements are never scanned for references
//! - Each hop of a reference chain is tracked; re-entering one fails with
//!   `Error::CircularReference` instead of recursing without bound

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::engine::model::{Config, EnvConfig};
use crate::engine::value::{dotted, Map, Value};
use crate::error::{Error, Result};

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{[0-9A-Za-z._-]+\}$").expect("reference pattern is valid"));

/// A parsed `${config.path.to.value}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReference {
    /// Target config name.
    pub config_name: String,
    /// Environment of the referencing config, used for the lookup.
    pub env: String,
    /// Keys into the target environment's content. Empty means the whole tree.
    pub path: Vec<String>,
}

impl ConfigReference {
    /// Parse `value` as a reference made from environment `env`.
    ///
    /// Returns `None` unless the entire string is a placeholder.
    pub fn parse(env: &str, value: &str) -> Option<Self> {
        if !is_reference(value) {
            return None;
        }
        let inner = &value[2..value.len() - 1];
        let mut parts = inner.split('.').map(str::to_string);
        let config_name = parts.next().unwrap_or_default();
        Some(Self {
            config_name,
            env: env.to_string(),
            path: parts.collect(),
        })
    }
}

/// Whether a string is a whole-value reference.
pub fn is_reference(value: &str) -> bool {
    REFERENCE_PATTERN.is_match(value)
}

/// One step of a reference chain: the target entry that was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hop {
    config: String,
    env: String,
    path: Vec<String>,
}

impl Hop {
    fn describe(&self) -> String {
        if self.path.is_empty() {
            format!("{}@{}", self.config, self.env)
        } else {
            format!("{}.{}@{}", self.config, dotted(&self.path), self.env)
        }
    }
}

/// Resolve every reference in `configs`, returning fresh configs in input order.
///
/// The input configs are only borrowed and never modified.
pub fn resolve_all<'a, I>(configs: I) -> Result<Vec<Config>>
where
    I: IntoIterator<Item = &'a Config>,
{
    let configs: Vec<&Config> = configs.into_iter().collect();
    let resolver = Resolver::new(configs.iter().copied());
    let resolved = configs
        .iter()
        .map(|config| resolver.resolve_config(config))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(configs = resolved.len(), "Resolved config references");
    Ok(resolved)
}

/// Read-only lookup over the unresolved config set.
#[derive(Debug)]
pub struct Resolver<'a> {
    by_name: HashMap<&'a str, &'a Config>,
}

impl<'a> Resolver<'a> {
    pub fn new(configs: impl IntoIterator<Item = &'a Config>) -> Self {
        let by_name = configs.into_iter().map(|config| (config.name(), config)).collect();
        Self { by_name }
    }

    /// Resolve each environment of `config` independently.
    pub fn resolve_config(&self, config: &Config) -> Result<Config> {
        let mut envs = BTreeMap::new();
        for env_config in config.envs() {
            let mut chain = Vec::new();
            let content = self.resolve_map(&[], env_config.content(), env_config, &mut chain)?;
            envs.insert(
                env_config.env().to_string(),
                EnvConfig::new(env_config.name(), env_config.env(), content),
            );
        }
        Ok(Config::from_envs(config.name().to_string(), envs))
    }

    fn resolve_map(
        &self,
        path: &[String],
        map: &Map,
        current: &EnvConfig,
        chain: &mut Vec<Hop>,
    ) -> Result<Map> {
        let mut resolved = Map::new();
        for (key, value) in map {
            let mut nested_path = path.to_vec();
            nested_path.push(key.clone());
            let value = self.resolve_value(&nested_path, value, current, chain)?;
            resolved.insert(key.clone(), value);
        }
        Ok(resolved)
    }

    fn resolve_value(
        &self,
        path: &[String],
        value: &Value,
        current: &EnvConfig,
        chain: &mut Vec<Hop>,
    ) -> Result<Value> {
        let text = match value {
            Value::Object(map) => {
                return self.resolve_map(path, map, current, chain).map(Value::Object);
            }
            Value::String(text) => text,
            _ => return Ok(value.clone()),
        };

        let Some(reference) = ConfigReference::parse(current.env(), text) else {
            return Ok(value.clone());
        };

        if reference.config_name == current.name() {
            return Err(Error::SelfReferencingConfig {
                config_name: current.name().to_string(),
                env: current.env().to_string(),
                location: path.to_vec(),
            });
        }

        let Some(target) = self.by_name.get(reference.config_name.as_str()) else {
            return Err(Error::ReferencingNonexistentConfig {
                config_name: current.name().to_string(),
                env: current.env().to_string(),
                location: path.to_vec(),
                target: reference.config_name,
            });
        };

        let unresolvable = || Error::UnresolvableReference {
            config_name: current.name().to_string(),
            env: current.env().to_string(),
            location: path.to_vec(),
            target: reference.config_name.clone(),
            path: reference.path.clone(),
        };

        let target_env = target.env_or_default(&reference.env).ok_or_else(unresolvable)?;
        let hop = Hop {
            config: target.name().to_string(),
            env: target_env.env().to_string(),
            path: reference.path.clone(),
        };

        if chain.contains(&hop) {
            let mut described: Vec<String> = chain.iter().map(Hop::describe).collect();
            described.push(hop.describe());
            return Err(Error::CircularReference {
                config_name: current.name().to_string(),
                env: current.env().to_string(),
                location: path.to_vec(),
                chain: described,
            });
        }

        let resolved = match reference.path.split_first() {
            None => {
                chain.push(hop);
                self.resolve_map(path, target_env.content(), current, chain)
                    .map(Value::Object)
            }
            Some((first, rest)) => {
                let fetched = lookup(target_env.content(), first, rest).ok_or_else(unresolvable)?;
                chain.push(hop);
                self.resolve_value(path, fetched, current, chain)
            }
        };
        chain.pop();
        resolved
    }
}

/// Walk `first` then `rest` through nested mappings of `content`.
fn lookup<'a>(content: &'a Map, first: &str, rest: &[String]) -> Option<&'a Value> {
    rest.iter()
        .try_fold(content.get(first)?, |value, key| value.as_object()?.get(key))
}
