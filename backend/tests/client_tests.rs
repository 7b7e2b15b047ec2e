//! The HTTP client against a live router on a loopback port.
#![cfg(all(feature = "client", feature = "http-server"))]

mod support;

use serde_json::json;
use tokio::net::TcpListener;

use elephant_server::client::{ClientError, ElephantClient};
use elephant_server::config::ServerConfig;
use elephant_server::http::{create_router, AppState};

async fn spawn_server() -> ElephantClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(support::builtin_registry(), &ServerConfig::default()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ElephantClient::new(&addr.ip().to_string(), addr.port())
}

#[tokio::test]
async fn test_call_returns_result_json() {
    let client = spawn_server().await;
    let out = client
        .call(
            "statistics",
            "isi",
            &json!({"data": {"spiketrain": [1.0, 1.5, 4.0]}, "units": {"time": "ms"}}),
        )
        .await
        .unwrap();
    assert_eq!(out, json!([0.5, 2.5]));
}

#[tokio::test]
async fn test_rejected_payload_is_bad_request() {
    let client = spawn_server().await;
    let err = client
        .call("signal_processing", "zscore", &json!({"data": {"signal": [1, 2]}}))
        .await
        .unwrap_err();
    match err {
        ClientError::BadRequest(api) => assert_eq!(api.code, "DESERIALIZE_ERROR"),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_runtime_failure_is_bad_request() {
    let client = spawn_server().await;
    let err = client
        .call(
            "conversion",
            "binned_spiketrain",
            &json!({"data": {"spiketrain": [1.0], "bin_size": 1e-6, "t_stop": 1e7}}),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.api_error().map(|e| e.code.as_str()),
        Some("ELEPHANT_RUNTIME_ERROR")
    );
}

#[tokio::test]
async fn test_unknown_function_is_not_found() {
    let client = spawn_server().await;
    let err = client.call("statistics", "nope", &json!({})).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref api) if api.code == "NOT_FOUND"), "{:?}", err);
}

#[tokio::test]
async fn test_listings() {
    let client = spawn_server().await;
    let modules = client.modules().await.unwrap();
    assert!(modules.iter().any(|m| m == "statistics"));
    let functions = client.functions("statistics").await.unwrap();
    assert!(functions.iter().any(|f| f == "isi"));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let err = ElephantClient::new("127.0.0.1", port)
        .call("statistics", "isi", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Request(_)), "{:?}", err);
}
