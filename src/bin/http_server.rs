//! HTTP Server Binary for the heritage search API
//!
//! Usage:
//!   cargo run --bin http_server -- --host 0.0.0.0 --port 8080 --index-url http://localhost:9200

use clap::Parser;
use heritage_search::{config::Config, config::Services, http::start_server};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "Heritage Search HTTP Server")]
#[command(
    about = "JSON API for faceted search over heritage datasets, objects and persons",
    long_about = None
)]
struct Args {
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Search index base URL
    #[arg(long, env = "HERITAGE_SEARCH_INDEX_URL")]
    index_url: Option<String>,

    /// SPARQL query endpoint
    #[arg(long, env = "HERITAGE_SEARCH_SPARQL_URL")]
    sparql_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.index_url {
        config.search.url = url;
    }
    if let Some(url) = args.sparql_url {
        config.sparql.url = url;
    }

    tracing::info!(index = %config.search.url, sparql = %config.sparql.url, "Connecting services");
    let services = Arc::new(Services::from_config(&config)?);

    let addr = format!("{}:{}", args.host, args.port);

    // Set up graceful shutdown
    let shutdown_signal = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received, stopping server");
    };

    // Run server with graceful shutdown
    tokio::select! {
        result = start_server(&addr, services) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        _ = shutdown_signal => {
            tracing::info!("Server shut down gracefully");
        }
    }

    Ok(())
}
