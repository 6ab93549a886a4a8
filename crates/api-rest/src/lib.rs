//! # API REST
//!
//! REST API implementation for MedPlat.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, panic-to-500 conversion)
//!
//! Uses `api-shared` for wire types and `medplat-core` for the business rules.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ErrorRes, GuidelineEntryRes, GuidelinesQuery, GuidelinesRes, HealthRes, HealthService,
    RegionRes,
};
use medplat_core::{choose_lookup_region, CoreConfig, GuidelineRegistry, RegionCode};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    registry: GuidelineRegistry,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let registry = cfg.guideline_registry();
        Self { cfg, registry }
    }

    fn detect_region(&self, headers: &HeaderMap) -> RegionCode {
        self.cfg
            .region_resolver()
            .resolve_with(|name| headers.get(name).map(|value| value.to_str()).transpose())
    }
}

/// Errors returned by handlers, rendered as `{ "ok": false, "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorRes::new(message))).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Converts a handler panic into a `500` JSON error carrying the panic message.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown internal error".to_string()
    };

    ApiError::Internal(details).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(health, guidelines, region),
    components(schemas(
        HealthRes,
        GuidelinesRes,
        GuidelineEntryRes,
        RegionRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the MedPlat REST router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/guidelines", get(guidelines))
        .route("/api/region", get(region))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve `CoreConfig` from the process environment.
///
/// # Environment Variables
/// - `MEDPLAT_GUIDELINES_FILE`: YAML guideline table replacing the built-in one (optional)
/// - `MEDPLAT_REGION_NAMES_FILE`: YAML mapping of region codes to table names (optional)
///
/// # Errors
/// Returns an error if an override file cannot be read or fails validation.
pub fn core_config_from_env() -> anyhow::Result<CoreConfig> {
    let guidelines_file = std::env::var("MEDPLAT_GUIDELINES_FILE")
        .ok()
        .map(PathBuf::from);
    let region_names_file = std::env::var("MEDPLAT_REGION_NAMES_FILE")
        .ok()
        .map(PathBuf::from);

    Ok(CoreConfig::from_overrides(
        guidelines_file,
        region_names_file,
    )?)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/guidelines",
    params(GuidelinesQuery),
    responses(
        (status = 200, description = "Guideline set for the region", body = GuidelinesRes),
        (status = 400, description = "Malformed query string", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Look up the clinical guidelines for a region
///
/// With `region=auto` (the default) the region is detected from the request's country
/// headers and translated through the configured region directory. Regions without a
/// guideline set receive the global fallback chain.
///
/// # Errors
/// Returns `400 Bad Request` if the query string cannot be parsed.
#[axum::debug_handler]
async fn guidelines(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<GuidelinesQuery>, QueryRejection>,
) -> Result<Json<GuidelinesRes>, ApiError> {
    let Query(query) = query?;

    let detected = state.detect_region(&headers);
    let lookup_region =
        choose_lookup_region(&query.region, &detected, state.cfg.region_directory());
    tracing::debug!(
        requested = %query.region,
        %detected,
        lookup_region = %lookup_region,
        "guideline lookup"
    );

    let set = state.registry.lookup(&lookup_region, &query.topic);
    Ok(Json(GuidelinesRes {
        ok: true,
        region: set.region,
        topic: set.topic,
        guidelines: set
            .guidelines
            .into_iter()
            .map(|g| GuidelineEntryRes {
                society: g.society,
                title: g.title,
                url: g.url,
            })
            .collect(),
        note: set.note,
    }))
}

#[utoipa::path(
    get,
    path = "/api/region",
    responses(
        (status = 200, description = "Region detected from the request headers", body = RegionRes)
    )
)]
/// Report the region detected for the calling client
///
/// The display name is only present when the deployment's region directory maps the code.
#[axum::debug_handler]
async fn region(State(state): State<AppState>, headers: HeaderMap) -> Json<RegionRes> {
    let detected = state.detect_region(&headers);
    let display_name = state
        .cfg
        .region_directory()
        .display_name(&detected)
        .map(str::to_string);

    Json(RegionRes {
        ok: true,
        region: detected.as_str().to_string(),
        display_name,
    })
}
