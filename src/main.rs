use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, app, core_config_from_env};

/// Main entry point for the MedPlat application
///
/// Loads `.env`, resolves configuration once and serves the REST API.
///
/// # Environment Variables
/// - `MEDPLAT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDPLAT_GUIDELINES_FILE`: YAML guideline table replacing the built-in table (optional)
/// - `MEDPLAT_REGION_NAMES_FILE`: YAML mapping of region codes to table names (optional)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medplat_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medplat_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDPLAT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting MedPlat REST on {}", rest_addr);

    let cfg = Arc::new(core_config_from_env()?);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app(AppState::new(cfg))).await?;

    Ok(())
}
