use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use config_server::engine::resolve_all;
use config_server::loaders::{LocalFolderLoader, Loader};

#[derive(Parser)]
#[command(name = "config-cli")]
#[command(about = "Management CLI for the config server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key, sent as a bearer token.
    #[arg(short, long, env = "SCS_ADMIN_API_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up
    Health,
    /// Fetch the resolved content of one config environment
    Get { name: String, env: String },
    /// Reload a single config document
    Reload { name: String },
    /// Reload every config document
    Refresh,
    /// Show server status
    Status,
    /// List served configs and their environments
    Configs,
    /// Compose and resolve a local document folder without a server
    Validate { folder: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let client = reqwest::Client::new();
    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    let request = match &cli.command {
        Commands::Health => client.get(format!("{}/healthcheck", cli.url)),
        Commands::Get { name, env } => client.get(format!("{}/config/{}/{}", cli.url, name, env)),
        Commands::Reload { name } => client
            .post(format!("{}/reload", cli.url))
            .query(&[("name", name)]),
        Commands::Refresh => client.post(format!("{}/refresh", cli.url)),
        Commands::Status => client.get(format!("{}/admin/status", cli.url)),
        Commands::Configs => client.get(format!("{}/admin/configs", cli.url)),
        Commands::Validate { folder } => return validate(folder),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

fn validate(folder: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let loader = LocalFolderLoader::new(folder);
    let configs = loader.load_all()?;
    let resolved = resolve_all(&configs)?;

    for config in &resolved {
        let envs: Vec<_> = config.env_names().collect();
        println!("{}: {}", config.name(), envs.join(", "));
    }
    println!("{} configs resolved successfully", resolved.len());
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
        Ok(())
    } else {
        eprintln!("Error: server returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
}
