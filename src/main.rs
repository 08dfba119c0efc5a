//! Campus Notify daemon
//!
//! Builds the application context and runs server-side maintenance (the
//! retention sweep) until asked to stop.

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_service::AppContext;
use campus_worker::CronScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("CAMPUS_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let env = std::env::var("CAMPUS_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_layered(&config_path, &env)
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

/// Main daemon run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Campus Notify v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Application context ──────────────────────────────
    let ctx = AppContext::from_config(config).await?;
    if !ctx.store().health_check().await? {
        return Err(AppError::storage("Document store failed its health check"));
    }

    // ── Step 2: Scheduled maintenance ────────────────────────────
    let mut scheduler = CronScheduler::new(ctx.clone()).await?;
    scheduler.register_default_tasks().await?;
    scheduler.start().await?;

    // ── Step 3: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping scheduler...");
    scheduler.shutdown().await?;

    tracing::info!("Campus Notify shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
