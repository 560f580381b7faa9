//! Config Server
//!
//! Serves named, environment-sharded configuration documents.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  CONFIG SERVER                   │
//!                    │                                                  │
//!   GET /config/     │  ┌─────────┐    ┌─────────┐    ┌─────────────┐   │
//!   {name}/{env}  ───┼─▶│  http   │───▶│  store  │───▶│  snapshot   │   │
//!                    │  │ server  │    │(ArcSwap)│    │ (resolved)  │   │
//!                    │  └─────────┘    └────┬────┘    └─────────────┘   │
//!                    │                      │ reload                    │
//!                    │                      ▼                           │
//!   *.json files ────┼──────────────▶┌─────────────┐   ┌────────────┐   │
//!                    │               │   loaders   │──▶│   engine   │   │
//!                    │               │ (compose)   │   │merge/resolve│  │
//!                    │               └─────────────┘   └────────────┘   │
//!                    │                                                  │
//!                    │   settings · observability · lifecycle · admin   │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use config_server::http::HttpServer;
use config_server::lifecycle::{bootstrap, run_reload_loop, signals::handle_signals, Shutdown};
use config_server::loaders::DocumentWatcher;
use config_server::observability::{logging, metrics};
use config_server::settings::load_settings;

#[derive(Parser)]
#[command(name = "config-server", version, about = "Serve environment-sharded configuration documents")]
struct Args {
    /// Path to the TOML settings file.
    #[arg(short, long, env = "SCS_SETTINGS_PATH")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = load_settings(args.settings.as_deref())?;

    logging::init_logging(&settings.observability.log_level);
    tracing::info!("config-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %settings.listener.bind_address,
        documents = %settings.documents.path,
        watch = settings.documents.watch,
        request_timeout_secs = settings.timeouts.request_secs,
        "Settings loaded"
    );

    if settings.observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = settings.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = bootstrap(&settings).await?;

    let shutdown = Shutdown::new();
    let (reload_tx, reload_rx) = mpsc::unbounded_channel();

    let _watcher = if settings.documents.watch {
        let watcher = DocumentWatcher::new(
            Path::new(&settings.documents.path),
            Duration::from_secs(settings.documents.poll_interval_secs),
            reload_tx.clone(),
        );
        Some(watcher.run()?)
    } else {
        None
    };

    tokio::spawn(run_reload_loop(store.clone(), reload_rx, shutdown.subscribe()));
    tokio::spawn(handle_signals(shutdown.clone(), reload_tx));

    let listener = TcpListener::bind(&settings.listener.bind_address).await?;
    let server = HttpServer::new(&settings, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
