#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use vislabel_server::handler::routes;
use vislabel_server::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
use vislabel_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig, create_detection_service};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "vislabel_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "vislabel_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "vislabel_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let detection =
        create_detection_service(&cli.provider).context("failed to create detection service")?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        provider = detection.provider_name(),
        "Label provider ready"
    );

    let state = ServiceState::new(detection, cli.defaults);
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server)
        .await
        .context("server terminated abnormally")?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - body limit and response headers
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state(state)
        .with_security(&middleware.security)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
