use std::net::SocketAddr;

use dotenv::dotenv;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use vital_trends_api::api::create_application;
use vital_trends_domain::{ConfigError, TrendsConfig};

/// Errors that can stop the server during startup or while running
#[derive(Debug, Error)]
enum AppError {
    /// Error that occurs during server operations
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    /// Error that occurs when parsing the port number
    #[error("Port parsing error: {0}")]
    PortParse(#[from] std::num::ParseIntError),

    /// Invalid aggregation settings in the environment
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The main entry point for the VitalTrends API server
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging
/// 3. Loads the calendar and aggregation settings
/// 4. Creates and starts the Axum web application
/// 5. Handles graceful shutdown
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting VitalTrends API server");

    let config = TrendsConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        utc_offset = %config.utc_offset,
        week_start = ?config.week_start,
        policy = ?config.missing_field_policy,
        max_weeks_back = config.max_weeks_back,
        "Aggregation settings loaded"
    );

    // Initialize server start time for uptime reporting in health checks
    vital_trends_api::api::handlers::health::initialize_server_start_time();

    // Create the Axum application with all routes and middleware
    let app = create_application(&config);

    // Get the port from environment or use default 3000
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    // Create a TCP listener and bind to the address
    let listener = TcpListener::bind(addr).await?;

    // Serve the application with graceful shutdown support
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for CTRL+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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

    info!("Shutting down server...");
}
