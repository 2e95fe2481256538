//! Integration Tests for the Lookup Proxy
//!
//! Exercises the full flow against stub token and vehicle endpoints:
//! router-level request/response cycles, cache idempotence and expiry,
//! and single-flight token acquisition under concurrency.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use mot_proxy::api::create_router;
use mot_proxy::cache::VehicleCache;
use mot_proxy::error::LookupError;
use mot_proxy::token::TokenManager;
use mot_proxy::upstream::VehicleApiClient;
use mot_proxy::{AppState, Config, VehicleLookupProxy};
use serde_json::{json, Value};
use tower::util::ServiceExt;

// == Helper Functions ==

fn test_config(server: &MockServer) -> Config {
    Config {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        api_key: "api-key".to_string(),
        token_url: server.url("/token"),
        scope_url: "https://tapi.dvsa.gov.uk/.default".to_string(),
        base_url: server.url("/vehicles"),
        server_port: 0,
        cleanup_interval: 60,
        http_timeout: 5,
    }
}

fn test_proxy(server: &MockServer) -> VehicleLookupProxy {
    VehicleLookupProxy::from_config(&test_config(server)).unwrap()
}

fn test_app(server: &MockServer) -> Router {
    create_router(AppState::new(test_proxy(server)))
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .body_contains("grant_type=client_credentials");
            then.status(200)
                .json_body(json!({"access_token": "test-token", "expires_in": 3600}));
        })
        .await
}

fn corolla_doc() -> Value {
    json!({
        "registration": "AB12CDE",
        "make": "TOYOTA",
        "model": "COROLLA",
        "primaryColour": "SILVER",
        "motTests": [
            {"expiryDate": "2024-01-01", "odometerValue": "50000"}
        ]
    })
}

async fn mock_vehicle<'a>(
    server: &'a MockServer,
    registration: &str,
    doc: Value,
) -> httpmock::Mock<'a> {
    let path = format!("/vehicles/{}", registration);
    server
        .mock_async(move |when, then| {
            when.method(GET)
                .path(path)
                .header("Authorization", "Bearer test-token")
                .header("X-API-Key", "api-key");
            then.status(200).json_body(doc);
        })
        .await
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Router Round-Trip Tests ==

#[tokio::test]
async fn test_lookup_returns_mapped_record_as_json() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    mock_vehicle(&server, "AB12CDE", corolla_doc()).await;

    let app = test_app(&server);
    let response = app
        .oneshot(
            // Raw input: lowercase with an encoded space, normalized on entry
            Request::builder()
                .uri("/vehicles/ab12%20cde")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["registration"], "AB12CDE");
    assert_eq!(body["make"], "TOYOTA");
    assert_eq!(body["model"], "COROLLA");
    assert_eq!(body["primaryColour"], "SILVER");
    assert_eq!(body["motExpiryDate"], "2024-01-01");
    assert_eq!(body["mileageAtLastMot"], 50_000);
}

#[tokio::test]
async fn test_lookup_without_mot_tests_returns_degraded_record() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let mut doc = corolla_doc();
    doc["motTests"] = json!([]);
    mock_vehicle(&server, "AB12CDE", doc).await;

    let app = test_app(&server);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/vehicles/AB12CDE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["motExpiryDate"], "1970-01-01");
    assert_eq!(body["mileageAtLastMot"], 0);
}

#[tokio::test]
async fn test_invalid_registration_is_400_and_touches_nothing() {
    let server = MockServer::start_async().await;
    let token_mock = mock_token(&server).await;

    let app = test_app(&server);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/vehicles/AB12-CDE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid"));

    // No token exchange happened for the rejected input
    assert_eq!(token_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_unknown_registration_is_404() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/vehicles/XX00XXX");
            then.status(404).body("No MOT history found");
        })
        .await;

    let app = test_app(&server);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/vehicles/XX00XXX")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_to_json(response.into_body()).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_missing_required_field_is_500() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let mut doc = corolla_doc();
    doc.as_object_mut().unwrap().remove("make");
    mock_vehicle(&server, "AB12CDE", doc).await;

    let app = test_app(&server);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/vehicles/AB12CDE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("make"));
}

#[tokio::test]
async fn test_rejected_token_exchange_is_502() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(401).body("bad credentials");
        })
        .await;

    let app = test_app(&server);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/vehicles/AB12CDE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// == Cache Behavior Tests ==

#[tokio::test]
async fn test_repeat_lookup_within_ttl_is_served_from_cache() {
    let server = MockServer::start_async().await;
    let token_mock = mock_token(&server).await;
    let vehicle_mock = mock_vehicle(&server, "AB12CDE", corolla_doc()).await;

    let proxy = test_proxy(&server);
    let first = proxy.get_vehicle_details("AB12CDE").await.unwrap();
    let second = proxy.get_vehicle_details("ab12 cde").await.unwrap();

    assert_eq!(first, second);
    // Exactly one token exchange and one upstream call for both lookups
    assert_eq!(token_mock.hits_async().await, 1);
    assert_eq!(vehicle_mock.hits_async().await, 1);

    let stats = proxy.cache().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_expired_cache_entry_triggers_fresh_upstream_call() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let vehicle_mock = mock_vehicle(&server, "AB12CDE", corolla_doc()).await;

    let config = test_config(&server);
    let client = reqwest::Client::new();
    let proxy = VehicleLookupProxy::new(
        VehicleCache::with_ttl(Duration::from_millis(50)),
        TokenManager::new(client.clone(), &config),
        VehicleApiClient::new(client, config.base_url.clone(), config.api_key.clone()),
    );

    proxy.get_vehicle_details("AB12CDE").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    proxy.get_vehicle_details("AB12CDE").await.unwrap();

    assert_eq!(vehicle_mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_failed_lookup_is_not_cached() {
    let server = MockServer::start_async().await;
    let token_mock = mock_token(&server).await;
    let vehicle_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/vehicles/AB12CDE");
            then.status(500).body("upstream exploded");
        })
        .await;

    let proxy = test_proxy(&server);

    let err = proxy.get_vehicle_details("AB12CDE").await.unwrap_err();
    assert!(matches!(
        err,
        LookupError::UpstreamHttp { status: 500, .. }
    ));
    assert!(proxy.cache().is_empty());

    // A retry goes upstream again instead of finding a poisoned entry
    let _ = proxy.get_vehicle_details("AB12CDE").await;
    assert_eq!(vehicle_mock.hits_async().await, 2);
    assert!(token_mock.hits_async().await >= 1);
}

// == Concurrency Tests ==

#[tokio::test]
async fn test_concurrent_first_lookups_share_one_token_exchange() {
    let server = MockServer::start_async().await;
    let token_mock = mock_token(&server).await;

    let mut doc_a = corolla_doc();
    doc_a["registration"] = json!("AA11AAA");
    let mut doc_b = corolla_doc();
    doc_b["registration"] = json!("BB22BBB");
    let vehicle_a = mock_vehicle(&server, "AA11AAA", doc_a).await;
    let vehicle_b = mock_vehicle(&server, "BB22BBB", doc_b).await;

    let proxy = std::sync::Arc::new(test_proxy(&server));

    let first = {
        let proxy = proxy.clone();
        tokio::spawn(async move { proxy.get_vehicle_details("AA11AAA").await })
    };
    let second = {
        let proxy = proxy.clone();
        tokio::spawn(async move { proxy.get_vehicle_details("BB22BBB").await })
    };

    let (first, second) = tokio::join!(first, second);
    assert!(first.unwrap().is_ok());
    assert!(second.unwrap().is_ok());

    // The second lookup waited on the in-flight exchange and reused it
    assert_eq!(token_mock.hits_async().await, 1);
    assert_eq!(vehicle_a.hits_async().await, 1);
    assert_eq!(vehicle_b.hits_async().await, 1);
}

// == Typed Error Tests ==

#[tokio::test]
async fn test_upstream_401_is_a_typed_error() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/vehicles/AB12CDE");
            then.status(401).body("token rejected");
        })
        .await;

    let proxy = test_proxy(&server);
    let err = proxy.get_vehicle_details("AB12CDE").await.unwrap_err();

    assert!(matches!(
        err,
        LookupError::UpstreamHttp { status: 401, .. }
    ));
}

#[tokio::test]
async fn test_token_rejection_is_a_typed_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(401).body("bad credentials");
        })
        .await;

    let proxy = test_proxy(&server);
    let err = proxy.get_vehicle_details("AB12CDE").await.unwrap_err();

    assert!(matches!(
        err,
        LookupError::UpstreamAuth { status: 401, .. }
    ));
}

#[tokio::test]
async fn test_malformed_mileage_is_a_typed_error() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let mut doc = corolla_doc();
    doc["motTests"][0]["odometerValue"] = json!("not a number");
    mock_vehicle(&server, "AB12CDE", doc).await;

    let proxy = test_proxy(&server);
    let err = proxy.get_vehicle_details("AB12CDE").await.unwrap_err();

    assert!(matches!(err, LookupError::MalformedMileage(_)));
}
