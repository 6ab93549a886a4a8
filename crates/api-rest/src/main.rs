//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the MedPlat REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `medplat-run` binary serves the
//! same router but also loads a `.env` file first.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, core_config_from_env, AppState};

/// Main entry point for the MedPlat REST API server
///
/// Starts the REST API server on the configured address (default: 0.0.0.0:3000).
///
/// # Environment Variables
/// - `MEDPLAT_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEDPLAT_GUIDELINES_FILE`, `MEDPLAT_REGION_NAMES_FILE`: see [`core_config_from_env`]
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration override file is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medplat_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDPLAT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting MedPlat REST API on {}", addr);

    let cfg = Arc::new(core_config_from_env()?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(AppState::new(cfg))).await?;

    Ok(())
}
