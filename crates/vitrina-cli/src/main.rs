#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vitrina_server::handler;
use vitrina_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
};
use vitrina_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

/// Tracing target for startup events.
pub const TRACING_TARGET_STARTUP: &str = "vitrina_cli::startup";

/// Tracing target for shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "vitrina_cli::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing();
    log_startup_info(&cli);

    cli.server
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid server configuration")?;

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to create service state")?;
    let router = create_router(state, &cli.middleware);

    server::serve_http(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let (api_routes, api_doc) = handler::routes().with_state(state).split_for_parts();

    let api_routes = api_routes.route(
        "/openapi.json",
        get(move || async move { Json(api_doc.clone()) }),
    );

    api_routes
        .with_security(middleware.cors.clone())
        .with_observability()
        .with_recovery(middleware.recovery.clone())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info(cli: &Cli) {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting vitrina server"
    );

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        vector_backend = %cli.service.vector_backend,
        request_timeout_secs = cli.middleware.recovery.request_timeout_secs,
        cors_origins = ?cli.middleware.cors.allowed_origins,
        "build and configuration information"
    );
}
