//! NxtOwner listing search server

mod config;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use config::AppConfig;
use listing_search::infra::storage::InMemoryListingRepository;
use listing_search::ListingSearchModule;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "nxtowner-search-server", version, about = "Listing search HTTP server")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/nxtowner-search.yaml")]
    config: PathBuf,

    /// Override the bind address from the config file
    #[arg(long)]
    bind: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// JSON listings fixture for the in-memory backend
    #[arg(long)]
    listings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = AppConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        cfg.server.bind = bind;
    }
    if cli.log_json {
        cfg.logging.json = true;
    }
    if cli.listings.is_some() {
        cfg.listings_path = cli.listings;
    }

    init_tracing(&cfg.logging);
    info!(config = %cli.config.display(), "starting nxtowner-search-server");

    let repository = match &cfg.listings_path {
        Some(path) => InMemoryListingRepository::from_json_file(path)?,
        None => {
            info!("no listings fixture configured, starting with an empty catalogue");
            InMemoryListingRepository::default()
        }
    };

    let module = ListingSearchModule::default();
    module.init(cfg.listing_search.clone(), Arc::new(repository))?;

    let app = module
        .register_rest(Router::new())?
        .layer(TimeoutLayer::new(cfg.server.request_timeout))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind))?;
    info!("listening on {}", cfg.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")?;

    info!("server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received");
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
