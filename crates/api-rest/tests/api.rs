use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use api_rest::{app, handle_panic, AppState};
use api_shared::{ErrorRes, GuidelinesRes, HealthRes, RegionRes};
use medplat_core::{CoreConfig, GuidelineTable, RegionDirectory};

fn default_app() -> Router {
    app(AppState::new(Arc::new(CoreConfig::default())))
}

fn app_with_directory(pairs: &[(&str, &str)]) -> Router {
    let directory = RegionDirectory::from_pairs(pairs.iter().copied()).expect("directory");
    let cfg = CoreConfig::new(GuidelineTable::builtin(), directory);
    app(AppState::new(Arc::new(cfg)))
}

async fn get_json<T: serde::de::DeserializeOwned>(
    router: Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, T) {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = router
        .oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let parsed = serde_json::from_slice(&bytes).expect("json body");
    (status, parsed)
}

#[tokio::test]
async fn health_reports_alive() {
    let (status, body): (_, HealthRes) = get_json(default_app(), "/health", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.ok);
}

#[tokio::test]
async fn guidelines_for_known_region() {
    let (status, body): (_, GuidelinesRes) = get_json(
        default_app(),
        "/api/guidelines?region=WHO&topic=hypertension",
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ok);
    assert_eq!(body.region, "WHO");
    assert_eq!(body.topic, "hypertension");
    assert!(body.guidelines.iter().any(|g| g.society == "WHO"));
    assert!(!body.note.is_empty());
}

#[tokio::test]
async fn guidelines_for_unknown_region_use_fallback_order() {
    let (status, body): (_, GuidelinesRes) =
        get_json(default_app(), "/api/guidelines?region=Atlantis", &[]).await;

    assert_eq!(status, StatusCode::OK);
    let societies: Vec<&str> = body.guidelines.iter().map(|g| g.society.as_str()).collect();
    assert_eq!(societies, vec!["WHO", "WHO", "NICE", "ESC", "AHA"]);
    assert_eq!(body.region, "Atlantis");
    assert_eq!(body.topic, "");
}

#[tokio::test]
async fn guidelines_default_to_global_fallback() {
    let (status, body): (_, GuidelinesRes) = get_json(
        default_app(),
        "/api/guidelines",
        &[("x-appengine-country", "DK")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.region, "Global (Fallback)");
}

#[tokio::test]
async fn auto_region_uses_configured_directory() {
    let router = app_with_directory(&[("dk", "Denmark")]);
    let (status, body): (_, GuidelinesRes) = get_json(
        router,
        "/api/guidelines?region=auto&topic=copd",
        &[("x-appengine-country", "ZZ"), ("cf-ipcountry", "DK")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.region, "Denmark");
    assert_eq!(body.guidelines[0].society, "Sundhedsstyrelsen");
}

#[tokio::test]
async fn malformed_query_is_a_bad_request() {
    let (status, body): (_, ErrorRes) = get_json(
        default_app(),
        "/api/guidelines?region=WHO&region=Denmark",
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.ok);
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn region_endpoint_reports_detected_code() {
    let router = app_with_directory(&[("gb", "United Kingdom")]);
    let (status, body): (_, RegionRes) =
        get_json(router, "/api/region", &[("cf-ipcountry", "GB")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.region, "gb");
    assert_eq!(body.display_name.as_deref(), Some("United Kingdom"));

    let (_, body): (_, RegionRes) = get_json(default_app(), "/api/region", &[]).await;
    assert_eq!(body.region, "global");
    assert_eq!(body.display_name, None);
}

#[tokio::test]
async fn non_ascii_country_header_degrades_to_global() {
    let router = app_with_directory(&[("gb", "United Kingdom")]);
    let request = Request::builder()
        .uri("/api/region")
        .header("x-appengine-country", HeaderValue::from_bytes(b"D\xc5").expect("opaque header"))
        .header("cf-ipcountry", "GB")
        .body(Body::empty())
        .expect("request");
    let response = router.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body: RegionRes = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body.region, "global");
    assert_eq!(body.display_name, None);
}

#[tokio::test]
async fn blank_region_parameter_is_treated_as_auto() {
    let (status, body): (_, GuidelinesRes) =
        get_json(default_app(), "/api/guidelines?region=", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.region, "Global (Fallback)");

    let router = app_with_directory(&[("dk", "Denmark")]);
    let (_, body): (_, GuidelinesRes) = get_json(
        router,
        "/api/guidelines?region=",
        &[("cf-ipcountry", "DK")],
    )
    .await;
    assert_eq!(body.region, "Denmark");
}

#[tokio::test]
async fn panics_become_json_internal_errors() {
    async fn explode() -> &'static str {
        panic!("guideline table corrupted")
    }

    let router = Router::new()
        .route("/boom", get(explode))
        .layer(CatchPanicLayer::custom(handle_panic));
    let (status, body): (_, ErrorRes) = get_json(router, "/boom", &[]).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.ok);
    assert_eq!(body.error, "guideline table corrupted");
}

#[tokio::test]
async fn openapi_document_lists_guideline_endpoint() {
    let (status, body): (_, serde_json::Value) =
        get_json(default_app(), "/api-docs/openapi.json", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/guidelines"].is_object());
}
