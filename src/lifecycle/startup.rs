//! Startup orchestration.

use std::sync::Arc;

use crate::error::Result;
use crate::loaders::{LocalFolderLoader, Loader};
use crate::settings::ServerSettings;
use crate::store::ConfigStore;

/// Build the store from settings and perform the initial load.
///
/// Any error here is fatal: the server does not start with a partial set.
pub async fn bootstrap(settings: &ServerSettings) -> Result<Arc<ConfigStore>> {
    let loader: Arc<dyn Loader> = Arc::new(LocalFolderLoader::new(&settings.documents.path));
    let store = Arc::new(ConfigStore::new(loader));

    let count = store.reload_all().await?;
    tracing::info!(path = %settings.documents.path, configs = count, "Initial configuration loaded");

    Ok(store)
}
