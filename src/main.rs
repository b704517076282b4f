//! URL shortener server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────────┐
//!                    │                      URLSHORT                          │
//!                    │                                                        │
//!   Client Request   │  ┌─────────┐    ┌──────────────────────────────────┐   │
//!   ─────────────────┼─▶│  http   │───▶│        live redirect chain        │   │
//!                    │  │ server  │    │  layer_n → ... → layer_1 → fallback│  │
//!                    │  └─────────┘    └──────────────────────────────────┘   │
//!                    │       ▲                        ▲                       │
//!   302/308 Location │       │                        │ compile + swap        │
//!   ◀────────────────┼───────┘          ┌─────────────┴──────────────┐        │
//!   or fallback      │                  │ config layers: inline,     │        │
//!                    │                  │ yaml/json/rows files, store │       │
//!                    │                  └────────────────────────────┘        │
//!                    │  ┌──────────────────────────────────────────────────┐  │
//!                    │  │ config watcher · admin API · logging · metrics   │  │
//!                    │  └──────────────────────────────────────────────────┘  │
//!                    └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use urlshort::admin::setup_admin_router;
use urlshort::config::{load_config, ConfigWatcher, ShortenerConfig};
use urlshort::http::HttpServer;
use urlshort::lifecycle::{signals, Shutdown};
use urlshort::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "urlshort")]
#[command(about = "Redirect server backed by layered path → URL tables", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "URLSHORT_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the configuration when the file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ShortenerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("urlshort v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        layers = config.layers.len(),
        redirect_status = config.redirect.status,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let admin = config.admin.clone();

    // A chain that does not compile at startup is fatal.
    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();

    if admin.enabled {
        let admin_listener = TcpListener::bind(&admin.bind_address).await?;
        let router = setup_admin_router(server.state().clone());
        let mut admin_shutdown = shutdown.subscribe();
        tracing::info!(address = %admin.bind_address, "Admin API listening");
        tokio::spawn(async move {
            let served = axum::serve(admin_listener, router)
                .with_graceful_shutdown(async move {
                    let _ = admin_shutdown.recv().await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "Admin API stopped");
            }
        });
    }

    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, config_updates, server_shutdown));
    signals::supervise(server_task, &shutdown, signals::ctrl_c()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
