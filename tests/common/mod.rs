//! Shared utilities for integration testing.

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use config_server::http::HttpServer;
use config_server::lifecycle::{bootstrap, Shutdown};
use config_server::settings::ServerSettings;
use config_server::store::ConfigStore;
use serde_json::Value;
use tempfile::TempDir;

/// A running server over a temporary document folder.
pub struct TestServer {
    pub addr: SocketAddr,
    pub dir: TempDir,
    pub store: Arc<ConfigStore>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Write (or overwrite) a document in the served folder.
    pub fn write_document(&self, name: &str, document: &Value) {
        write_document(&self.dir, name, document);
    }

    pub fn remove_document(&self, name: &str) {
        fs::remove_file(self.dir.path().join(format!("{name}.json"))).unwrap();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn write_document(dir: &TempDir, name: &str, document: &Value) {
    let content = serde_json::to_string_pretty(document).unwrap();
    fs::write(dir.path().join(format!("{name}.json")), content).unwrap();
}

/// Start a server on an ephemeral port serving `documents`.
pub async fn start_server(documents: &[(&str, Value)]) -> TestServer {
    start_server_with(documents, |_| {}).await
}

pub async fn start_server_with<F>(documents: &[(&str, Value)], customize: F) -> TestServer
where
    F: FnOnce(&mut ServerSettings),
{
    let dir = TempDir::new().unwrap();
    for (name, document) in documents {
        write_document(&dir, name, document);
    }

    let mut settings = ServerSettings::default();
    settings.listener.bind_address = "127.0.0.1:0".to_string();
    settings.documents.path = dir.path().to_string_lossy().into_owned();
    customize(&mut settings);

    let store = bootstrap(&settings).await.expect("initial load");
    let listener = tokio::net::TcpListener::bind(&settings.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&settings, store.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound, so requests queue until the server polls.
    tokio::time::sleep(Duration::from_millis(20)).await;

    TestServer { addr, dir, store, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
