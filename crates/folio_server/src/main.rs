//! `folio_server` binary: serves the contact endpoint.

use std::path::PathBuf;

use clap::Parser;
use folio_server::{router, AppState, ServerConfig, ServerError, ServerResult};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "folio_server")]
#[command(about = "Contact form endpoint for the Folio portfolio site")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ServerResult<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_ref() {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = cli.config.as_ref() {
        info!(path = %path.display(), "configuration loaded");
    }

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, "contact endpoint listening");

    axum::serve(listener, router(AppState::default()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
