//! pgconsole server: a web console for browsing and editing a PostgreSQL
//! database behind a single shared login.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use pgconsole_auth::SessionCleanup;
use pgconsole_core::config::AppConfig;
use pgconsole_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` files and `PGCONSOLE__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PGCONSOLE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.environment,
        "Starting pgconsole v{}",
        env!("CARGO_PKG_VERSION")
    );
    if config.auth.uses_placeholder_secret() {
        tracing::warn!("auth.secret is the shipped placeholder; set PGCONSOLE__AUTH__SECRET");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let cleanup_interval = Duration::from_secs(config.session.cleanup_interval_minutes.max(1) * 60);

    let state = pgconsole_api::AppState::new(config)?;

    // Startup probe: the console still starts when the database is down.
    match state.gateway.health_check().await {
        Ok(()) => tracing::info!("Database reachable"),
        Err(e) => tracing::warn!(error = %e, "Database not reachable at startup"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup_handle = SessionCleanup::new(
        Arc::clone(&state.sessions),
        Arc::clone(&state.throttle),
        cleanup_interval,
    )
    .spawn(shutdown_rx);

    let app = pgconsole_api::build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("pgconsole listening on {}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    let _ = tokio::time::timeout(grace, cleanup_handle).await;
    tracing::info!("pgconsole shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
