//! Resolved configuration store.
//!
//! # Data Flow
//! ```text
//! reload(name) / reload_all()
//!     → loader (blocking thread)
//!     → raw set updated (copy of the current snapshot's raw set)
//!     → engine::resolve_all over the full raw set
//!     → atomic swap of Arc<Snapshot>
//!
//! get_config(name, env)
//!     → current snapshot (lock-free load)
//! ```
//!
//! # Design Decisions
//! - Readers never see a partially reloaded set: a snapshot is built off to
//!   the side and published with a single `ArcSwap::store`
//! - A failed reload leaves the previous snapshot in place
//! - Reloads are serialized so concurrent single-config reloads cannot drop
//!   each other's update

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use arc_swap::ArcSwap;
use tokio::sync::Mutex;

use crate::engine::{resolve_all, Config, Map};
use crate::error::{Error, Result};
use crate::loaders::Loader;
use crate::observability::metrics;

/// An immutable view of the served configuration set.
#[derive(Debug, Default)]
pub struct Snapshot {
    raw: BTreeMap<String, Config>,
    resolved: HashMap<String, Config>,
    loaded_at: Option<SystemTime>,
}

impl Snapshot {
    /// Resolve `raw` into a new snapshot.
    fn build(raw: BTreeMap<String, Config>) -> Result<Self> {
        let resolved = resolve_all(raw.values())?
            .into_iter()
            .map(|config| (config.name().to_string(), config))
            .collect();

        Ok(Self {
            raw,
            resolved,
            loaded_at: Some(SystemTime::now()),
        })
    }

    /// Resolved config by name.
    pub fn get(&self, name: &str) -> Option<&Config> {
        self.resolved.get(name)
    }

    /// Names of all served configs, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// When this snapshot was published. `None` before the first load.
    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.loaded_at
    }
}

/// Owns the loader and the currently served snapshot.
#[derive(Debug)]
pub struct ConfigStore {
    loader: Arc<dyn Loader>,
    snapshot: ArcSwap<Snapshot>,
    reload_lock: Mutex<()>,
}

impl ConfigStore {
    /// Create an empty store. Nothing is served until the first reload.
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        Self {
            loader,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            reload_lock: Mutex::new(()),
        }
    }

    /// The currently served snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Resolved content of one environment of one config.
    pub fn get_config(&self, name: &str, env: &str) -> Result<Map> {
        let snapshot = self.snapshot.load();
        let config = snapshot.get(name).ok_or_else(|| Error::config_not_found(name))?;
        let env_config = config.env(env).ok_or_else(|| Error::EnvNotFound {
            name: name.to_string(),
            env: env.to_string(),
        })?;
        Ok(env_config.content().clone())
    }

    /// Reload a single document and re-resolve the whole set.
    pub async fn reload(&self, name: &str) -> Result<()> {
        let _guard = self.reload_lock.lock().await;
        let start = Instant::now();

        let loader = Arc::clone(&self.loader);
        let owned_name = name.to_string();
        let loaded = tokio::task::spawn_blocking(move || loader.load(&owned_name))
            .await
            .unwrap_or_else(|e| Err(Error::from(e)));

        let result = loaded.and_then(|config| {
            let mut raw = self.snapshot.load().raw.clone();
            raw.insert(config.name().to_string(), config);
            self.publish(raw)
        });
        self.record("single", start, &result);
        if result.is_ok() {
            tracing::info!(config = %name, "Config reloaded");
        }
        result
    }

    /// Reload every document, completely replacing the served set.
    pub async fn reload_all(&self) -> Result<usize> {
        let _guard = self.reload_lock.lock().await;
        let start = Instant::now();

        let loader = Arc::clone(&self.loader);
        let loaded = tokio::task::spawn_blocking(move || loader.load_all())
            .await
            .unwrap_or_else(|e| Err(Error::from(e)));

        let result = loaded.and_then(|configs| {
            let raw: BTreeMap<String, Config> = configs
                .into_iter()
                .map(|config| (config.name().to_string(), config))
                .collect();
            let count = raw.len();
            self.publish(raw).map(|()| count)
        });
        self.record("all", start, &result);
        if let Ok(count) = result {
            tracing::info!(configs = count, "All configs reloaded");
        }
        result
    }

    fn publish(&self, raw: BTreeMap<String, Config>) -> Result<()> {
        let snapshot = Snapshot::build(raw)?;
        metrics::record_configs_loaded(snapshot.len());
        self.snapshot.store(Arc::new(snapshot));
        Ok(())
    }

    fn record<T>(&self, scope: &'static str, start: Instant, result: &Result<T>) {
        metrics::record_reload(scope, result.is_ok(), start);
        if let Err(e) = result {
            tracing::error!(scope, error = %e, "Reload failed, keeping current configuration");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Document, DEFAULT_ENV};
    use crate::loaders::InMemoryLoader;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn store_with(loader: &Arc<InMemoryLoader>) -> ConfigStore {
        ConfigStore::new(Arc::clone(loader) as Arc<dyn Loader>)
    }

    fn fixture() -> Arc<InMemoryLoader> {
        Arc::new(InMemoryLoader::from_documents([
            ("db", document(json!({
                "default": {"host": "localhost"},
                "shards": [{"envs": ["prod"], "content": {"host": "db.prod"}}]
            }))),
            ("app", document(json!({
                "default": {"db_host": "${db.host}"},
                "shards": [{"envs": ["prod"], "content": {}}]
            }))),
        ]))
    }

    #[tokio::test]
    async fn test_empty_store_serves_nothing() {
        let store = store_with(&fixture());
        assert!(store.snapshot().is_empty());
        assert!(store.snapshot().loaded_at().is_none());
        assert!(matches!(store.get_config("db", DEFAULT_ENV), Err(Error::ConfigNotFound { .. })));
    }

    #[tokio::test]
    async fn test_reload_all_serves_resolved_configs() {
        let store = store_with(&fixture());
        assert_eq!(store.reload_all().await.unwrap(), 2);

        let prod = store.get_config("app", "prod").unwrap();
        assert_eq!(prod["db_host"], json!("db.prod"));
        let default = store.get_config("app", DEFAULT_ENV).unwrap();
        assert_eq!(default["db_host"], json!("localhost"));
        assert_eq!(store.snapshot().names().collect::<Vec<_>>(), vec!["app", "db"]);
    }

    #[tokio::test]
    async fn test_unknown_env_and_config() {
        let store = store_with(&fixture());
        store.reload_all().await.unwrap();

        match store.get_config("db", "staging") {
            Err(Error::EnvNotFound { name, env }) => {
                assert_eq!(name, "db");
                assert_eq!(env, "staging");
            }
            other => panic!("expected env not found, got {:?}", other),
        }
        assert!(matches!(store.get_config("ghost", "prod"), Err(Error::ConfigNotFound { .. })));
    }

    #[tokio::test]
    async fn test_reload_single_re_resolves_dependants() {
        let loader = fixture();
        let store = store_with(&loader);
        store.reload_all().await.unwrap();

        loader.insert("db", document(json!({"default": {"host": "db.new"}})));
        store.reload("db").await.unwrap();

        assert_eq!(store.get_config("app", DEFAULT_ENV).unwrap()["db_host"], json!("db.new"));
        // prod no longer exists on db, so app/prod falls back to db's default
        assert_eq!(store.get_config("app", "prod").unwrap()["db_host"], json!("db.new"));
    }

    #[tokio::test]
    async fn test_reload_unknown_name_fails() {
        let store = store_with(&fixture());
        store.reload_all().await.unwrap();
        assert!(matches!(store.reload("ghost").await, Err(Error::ConfigNotFound { .. })));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let loader = fixture();
        let store = store_with(&loader);
        store.reload_all().await.unwrap();
        let before = store.snapshot();

        loader.insert("app", document(json!({"default": {"db_host": "${app.db_host}"}})));
        assert!(matches!(store.reload("app").await, Err(Error::SelfReferencingConfig { .. })));
        assert!(matches!(store.reload_all().await, Err(Error::SelfReferencingConfig { .. })));

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.get_config("app", "prod").unwrap()["db_host"], json!("db.prod"));
    }

    #[derive(Debug)]
    struct PanickingLoader;

    impl Loader for PanickingLoader {
        fn load(&self, name: &str) -> Result<Config> {
            panic!("cannot load {name}");
        }

        fn load_all(&self) -> Result<Vec<Config>> {
            panic!("cannot load anything");
        }
    }

    #[tokio::test]
    async fn test_panicking_loader_is_reported_as_task_error() {
        let store = ConfigStore::new(Arc::new(PanickingLoader));
        let before = store.snapshot();

        assert!(matches!(store.reload_all().await, Err(Error::Task(_))));
        assert!(matches!(store.reload("app").await, Err(Error::Task(_))));

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        // The reload lock was released on the failure path
        assert!(store.reload_lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_reload_all_drops_removed_documents() {
        let loader = fixture();
        let store = store_with(&loader);
        store.reload_all().await.unwrap();

        loader.remove("app");
        assert_eq!(store.reload_all().await.unwrap(), 1);
        assert!(matches!(store.get_config("app", DEFAULT_ENV), Err(Error::ConfigNotFound { .. })));
    }
}
