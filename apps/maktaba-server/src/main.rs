//! Maktaba Server
//!
//! Serves EPUB book content, tables of contents and in-book search for the
//! Maktaba book platform.

use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maktaba_server::config::Config;
use maktaba_server::library::BookCatalog;
use maktaba_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "maktaba_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Maktaba Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Library catalog: {}", config.library.catalog.display());
    tracing::info!("Library root: {}", config.library.root.display());

    let catalog = BookCatalog::load(&config.library.catalog, &config.library.root)
        .await
        .expect("Failed to load library catalog");
    tracing::info!("Library initialized with {} books", catalog.len().await);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .unwrap_or_else(|e| {
            tracing::warn!("Invalid SERVER_HOST {}: {}, binding 0.0.0.0", config.server.host, e);
            SocketAddr::from(([0, 0, 0, 0], config.server.port))
        });

    let app = maktaba_server::app(AppState::new(config, catalog));

    // Start server with graceful shutdown
    tracing::info!("Maktaba Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
