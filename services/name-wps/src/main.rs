//! NAME WPS Server
//!
//! Exposes parameterised NAME dispersion-model runs as Web Processing
//! Service processes.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use name_wps::build_router;
use name_wps::config::ServiceConfig;
use name_wps::state::AppState;

/// NAME WPS Server
#[derive(Parser, Debug)]
#[command(name = "name-wps")]
#[command(about = "Web Processing Service for NAME dispersion-model runs")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "NAME_WPS_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address (overrides the configuration file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting NAME WPS server");

    let mut config = ServiceConfig::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", config.output_dir))?;

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen))?;

    let state = Arc::new(AppState::from_config(config));
    info!(
        processes = ?state.processes.iter().map(|p| p.identifier()).collect::<Vec<_>>(),
        output_dir = %state.config.output_dir.display(),
        "Loaded configuration"
    );

    let app = build_router(state);

    info!("NAME WPS listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
