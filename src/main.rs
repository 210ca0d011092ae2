use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use parley_gateway::routes::create_router;
use parley_gateway::{AppState, ServerConfig};

/// Parley Gateway - speaker sentiment analysis server
#[derive(Parser, Debug)]
#[command(name = "parley-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides configuration)
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = if let Some(config_path) = cli.config {
        info!("loading configuration from {}", config_path.display());
        ServerConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    if let Some(port) = cli.port {
        config.port = port;
    }

    let address = config.address();
    let state = Arc::new(AppState::new(config).map_err(|e| anyhow!(e.to_string()))?);
    let router = create_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("parley-gateway listening on {address}");
    axum::serve(listener, router).await?;

    Ok(())
}
