//! Cover Store - stores uploaded cover images with resized variants.
//!
//! This binary loads configuration, prepares the tier directories and starts
//! the HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cover_store::{
    config::Config,
    server::{create_router, RouterConfig},
    storage::{FsTierStore, Tier},
};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv();

    let config = Config::parse();

    init_logging(config.verbose);

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Upload dir: {}", config.upload_dir.display());
    info!("  Max file size: {} bytes", config.max_file_size);

    let store = FsTierStore::new(&config.upload_dir);
    if let Err(e) = store.ensure_dirs().await {
        error!(
            "Failed to create tier directories under {}: {}",
            config.upload_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }
    for tier in Tier::ALL {
        info!("  Tier {}: {}", tier, store.tier_dir(tier).display());
    }

    let router = create_router(store, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Cover API running at http://{}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "cover_store=debug,tower_http=debug"
    } else {
        "cover_store=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    RouterConfig::new(config.api_key.clone())
        .with_max_file_size(config.max_file_size)
        .with_tracing(!config.no_tracing)
}
