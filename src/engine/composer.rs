//! Environment composition.
//!
//! Expands a `{default, shards}` document into one content tree per
//! environment. Every environment touched by a shard starts from a copy of
//! the default tree; shards are then merged in document order, so later
//! shards override earlier ones at scalar keys and extend them at list keys.

use std::collections::BTreeMap;

use crate::engine::merge::merge;
use crate::engine::model::{Config, Document, EnvConfig, Shard, DEFAULT_ENV};
use crate::engine::value::Map;
use crate::error::Result;

/// Build the per-environment config for a parsed document.
pub fn compose_document(name: &str, document: &Document) -> Result<Config> {
    compose(name, &document.default, &document.shards)
}

/// Build the per-environment config from a default tree and ordered shards.
pub fn compose(name: &str, default: &Map, shards: &[Shard]) -> Result<Config> {
    let mut content_by_env: BTreeMap<String, Map> = BTreeMap::new();
    content_by_env.insert(DEFAULT_ENV.to_string(), default.clone());

    for shard in shards {
        for env in &shard.envs {
            let current = content_by_env
                .entry(env.clone())
                .or_insert_with(|| default.clone());
            let merged = merge([&*current, &shard.content])?;
            *current = merged;
        }
    }

    tracing::trace!(config = %name, envs = content_by_env.len(), "Composed config environments");

    let envs = content_by_env
        .into_iter()
        .map(|(env, content)| {
            let env_config = EnvConfig::new(name, env.clone(), content);
            (env, env_config)
        })
        .collect();

    Ok(Config::from_envs(name.to_string(), envs))
}
