//! d2i-console - disk2iso web console
//!
//! Serves the console page, renders its fragments from the disk2iso backend
//! API and runs the MusicBrainz disambiguation poll.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use d2i_common::config::{ConfigOverrides, ConfigResolver};
use d2i_console::client::BackendClient;
use d2i_console::disambiguation::WorkflowTimings;
use d2i_console::i18n::Locale;
use d2i_console::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for d2i-console
#[derive(Parser, Debug)]
#[command(name = "d2i-console")]
#[command(about = "Web console for the disk2iso disc ripper")]
#[command(version)]
struct Args {
    /// Base URL of the disk2iso backend API
    #[arg(short, long, env = "D2I_BACKEND_URL")]
    backend_url: Option<String>,

    /// Address to listen on (host:port)
    #[arg(short, long, env = "D2I_LISTEN_ADDR")]
    listen: Option<String>,

    /// UI locale (de, en)
    #[arg(long, env = "D2I_LOCALE")]
    locale: Option<String>,

    /// Path to a console.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing at info until the configured level is known
    let rust_log_set = std::env::var("RUST_LOG").is_ok();
    let initial_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let (filter_layer, filter_handle) = reload::Layer::new(initial_filter);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting disk2iso console (d2i-console) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // CLI > environment > TOML > defaults
    let config = ConfigResolver::new(ConfigOverrides {
        backend_url: args.backend_url,
        listen_addr: args.listen,
        locale: args.locale,
        config_file: args.config,
    })
    .resolve();

    if !rust_log_set {
        match EnvFilter::try_new(&config.log_level) {
            Ok(filter) => {
                if let Err(e) = filter_handle.reload(filter) {
                    warn!("Failed to apply log level {}: {}", config.log_level, e);
                }
            }
            Err(e) => warn!("Invalid log level {}: {}", config.log_level, e),
        }
    }

    let locale: Locale = config.locale.parse().unwrap_or_else(|e| {
        warn!("{}, using de", e);
        Locale::De
    });

    let client = BackendClient::new(&config.backend_url, config.request_timeout)
        .context("Failed to build backend client")?;
    info!("Backend: {}", client.base_url());

    let timings = WorkflowTimings {
        poll_interval: config.poll_interval,
        ..WorkflowTimings::default()
    };
    let state = AppState::with_workflow_timings(client, locale, timings);

    // Disambiguation poll runs for the lifetime of the service
    state.musicbrainz.start_polling().await;

    let app = build_router(state.clone());

    let listener = match tokio::net::TcpListener::bind(config.listen_addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.listen_addr, e);
            return Err(e).context("Failed to bind to address");
        }
    };
    info!("d2i-console listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.musicbrainz.stop_polling().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
