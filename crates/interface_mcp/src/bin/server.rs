//! CRM bridge server binary
//!
//! Starts the stdio JSON-RPC server that translates named CRM operations
//! into authenticated HubSpot API calls.
//!
//! # Environment Variables
//!
//! * `NANGO_CONNECTION_ID` / `NANGO_INTEGRATION_ID` / `NANGO_BASE_URL` /
//!   `NANGO_SECRET_KEY` - delegated-auth broker settings
//! * `HUBSPOT_ACCESS_TOKEN` - static fallback token
//! * `BRIDGE_API_BASE_URL` - CRM API base (default: https://api.hubapi.com)
//! * `BRIDGE_TOKEN_PRECEDENCE` - "broker_first" (default) or "static_first"
//! * `BRIDGE_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_crm::{CredentialResolver, HubSpotExecutor};
use interface_mcp::{AppConfig, Dispatcher, McpServer};

/// Main entry point for the bridge server.
///
/// Initializes logging, loads configuration, wires the credential resolver
/// into the executor and the executor into the dispatcher, then serves the
/// stdio loop until EOF or a shutdown signal.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        api_base_url = %config.api_base_url,
        precedence = ?config.precedence(),
        "Starting CRM bridge server"
    );

    // Explicit dependency injection: one resolver, one executor, one
    // dispatcher for the process lifetime.
    let resolver = Arc::new(CredentialResolver::from_env(config.precedence()));
    let executor = Arc::new(HubSpotExecutor::new(&config.api_base_url, resolver)?);
    let dispatcher = Arc::new(Dispatcher::new(executor));
    let server = McpServer::new(dispatcher);

    tokio::select! {
        outcome = server.run() => outcome?,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Log output goes to stderr: stdout carries the JSON-RPC stream.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
