//! End-to-end tests of the HTTP surface.

mod support;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use elephant_server::config::ServerConfig;
use elephant_server::http::{create_router, AppState};

fn app() -> Router {
    create_router(AppState::new(support::builtin_registry(), &ServerConfig::default()))
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn post(uri: &str, payload: Value) -> (StatusCode, Value) {
    send(app(), Method::POST, uri, Body::from(payload.to_string())).await
}

#[tokio::test]
async fn test_index_reports_version() {
    let (status, body) = send(app(), Method::GET, "/", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["elephant"], json!(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), Method::GET, "/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "version": "v1"}));
}

#[tokio::test]
async fn test_module_listing() {
    let (status, body) = send(app(), Method::GET, "/api", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!(["conversion", "signal_processing", "spike_train_generation", "statistics"])
    );

    let (status, body) = send(app(), Method::GET, "/api/statistics", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["cv", "fanofactor", "isi", "mean_firing_rate"]));

    let (status, body) = send(app(), Method::GET, "/api/astronomy", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_binned_spiketrain_round_trip() {
    let (status, body) = post(
        "/api/conversion/binned_spiketrain",
        json!({
            "data": {"spiketrain": [1, 1.5, 2.7], "bin_size": 3, "t_start": 0},
            "units": {"time": "ms"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(
        body["spiketrain"],
        json!({"spiketrain": {"times": [1.0, 1.5, 2.7], "units": "ms", "t_start": 0.0, "t_stop": 3.0}})
    );
    assert_eq!(body["bin_size"], json!(3.0));
    assert_eq!(body["bin_edges"], json!([0.0, 3.0]));
    assert_eq!(body["counts"], json!([3]));
}

#[tokio::test]
async fn test_response_units_follow_request() {
    let (status, body) = post(
        "/api/statistics/isi",
        json!({
            "data": {"spiketrain": {"times": [1, 3, 7], "units": "s", "t_stop": 10}},
            "units": {"time": "ms"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let isi: Vec<f64> = serde_json::from_value(body).unwrap();
    approx::assert_relative_eq!(isi[0], 2000.0, epsilon = 1e-6);
    approx::assert_relative_eq!(isi[1], 4000.0, epsilon = 1e-6);
}

#[tokio::test]
async fn test_broadcast_over_spiketrains() {
    let (status, body) = post(
        "/api/statistics/isi",
        json!({"data": {"spiketrains": [[1, 2], [3, 5, 9]]}, "t_stop": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body, json!([[1.0], [2.0, 4.0]]));
}

#[tokio::test]
async fn test_get_with_empty_body_is_empty_call() {
    let (status, body) = send(app(), Method::GET, "/api/statistics/isi", Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ELEPHANT_RUNTIME_ERROR");
    assert!(body["message"].as_str().unwrap().contains("spiketrain"));
}

#[tokio::test]
async fn test_error_codes() {
    let (status, body) = post("/api/statistics/nope", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = post("/api/statistics/cv", json!({"data": {"spiketrain": [1, 2]}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ELEPHANT_RUNTIME_ERROR");

    let (status, body) = post(
        "/api/statistics/isi",
        json!({"data": {"spiketrain": [1, 2]}, "units": {"time": "furlong"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DESERIALIZE_ERROR");

    let (status, body) = send(
        app(),
        Method::POST,
        "/api/statistics/isi",
        Body::from("{\"data\": "),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_configured_default_units() {
    let app = create_router(AppState::new(
        support::builtin_registry(),
        &support::config_with_time_unit("s"),
    ));
    let (status, body) = send(
        app,
        Method::POST,
        "/api/statistics/isi",
        Body::from(json!({"data": {"spiketrain": [0.5, 2.0]}}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body, json!([1.5]));
}

#[tokio::test]
async fn test_body_limit() {
    let mut config = ServerConfig::default();
    config.max_body_bytes = 16;
    let app = create_router(AppState::new(support::builtin_registry(), &config));
    let payload = json!({"data": {"spiketrain": [1, 2, 3, 4, 5, 6, 7, 8]}}).to_string();
    let (status, _) = send(app, Method::POST, "/api/statistics/isi", Body::from(payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
