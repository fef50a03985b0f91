use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use snaplink_api_server::app;
use snaplink_api_server::config::AppConfig;
use snaplink_api_server::routes::AppState;

const TEST_API_KEY: &str = "test-secret-key";

fn test_server(api_key: Option<&str>) -> TestServer {
    let config = AppConfig {
        api_key: api_key.map(String::from),
        ..AppConfig::default()
    };
    TestServer::new(app(AppState::new(config))).unwrap()
}

fn auth_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {TEST_API_KEY}")).unwrap(),
    )
}

fn secret_upload() -> Value {
    json!({"encryptedSecret": "AgABAgMEBQYHCAkKCw==", "expiration": 3600})
}

// ─── Health ─────────────────────────────────────────────────

#[tokio::test]
async fn test_health_no_auth() {
    let server = test_server(Some(TEST_API_KEY));

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    resp.assert_json(&json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}));
}

// ─── Auth ───────────────────────────────────────────────────

#[tokio::test]
async fn test_401_without_token() {
    let server = test_server(Some(TEST_API_KEY));

    let resp = server.post("/api/v1/secrets").json(&secret_upload()).await;
    resp.assert_status_unauthorized();
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_401_with_wrong_token() {
    let server = test_server(Some(TEST_API_KEY));

    let resp = server
        .post("/api/v1/files")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer wrong-key"),
        )
        .json(&json!({
            "encryptedSecret": "AgAB",
            "expiration": 60,
            "metadata": {"originalFilename": "a.txt", "contentType": "text/plain"}
        }))
        .await;
    resp.assert_status_unauthorized();
}

#[tokio::test]
async fn test_valid_token_creates_and_fetch_needs_none() {
    let server = test_server(Some(TEST_API_KEY));
    let (header_name, header_val) = auth_header();

    let resp = server
        .post("/api/v1/secrets")
        .add_header(header_name, header_val)
        .json(&secret_upload())
        .await;
    resp.assert_status(StatusCode::CREATED);
    let id = resp.json::<Value>()["id"].as_str().unwrap().to_string();

    let resp = server.get(&format!("/api/v1/secrets/{id}")).await;
    resp.assert_status_ok();
}

#[tokio::test]
async fn test_open_server_accepts_uploads_without_token() {
    let server = test_server(None);

    let resp = server.post("/api/v1/secrets").json(&secret_upload()).await;
    resp.assert_status(StatusCode::CREATED);
}

// ─── Secrets ────────────────────────────────────────────────

#[tokio::test]
async fn test_secret_is_served_once() {
    let server = test_server(None);

    let resp = server.post("/api/v1/secrets").json(&secret_upload()).await;
    let id = resp.json::<Value>()["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let resp = server.get(&format!("/api/v1/secrets/{id}")).await;
    resp.assert_status_ok();
    assert_eq!(resp.header("cache-control"), "no-store");
    resp.assert_json(&json!({"encryptedSecret": "AgABAgMEBQYHCAkKCw=="}));

    let resp = server.get(&format!("/api/v1/secrets/{id}")).await;
    resp.assert_status_not_found();
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "SECRET_NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_and_consumed_look_the_same() {
    let server = test_server(None);

    let resp = server.post("/api/v1/secrets").json(&secret_upload()).await;
    let id = resp.json::<Value>()["id"].as_str().unwrap().to_string();
    server.get(&format!("/api/v1/secrets/{id}")).await;

    let consumed: Value = server
        .get(&format!("/api/v1/secrets/{id}"))
        .await
        .json();
    let unknown: Value = server
        .get("/api/v1/secrets/neverexisted")
        .await
        .json();
    assert_eq!(consumed, unknown);
}

#[tokio::test]
async fn test_bad_expiration() {
    let server = test_server(None);

    let resp = server
        .post("/api/v1/secrets")
        .json(&json!({"encryptedSecret": "AgAB", "expiration": 8 * 24 * 3600}))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_body_limit() {
    let config = AppConfig {
        max_body_bytes: 1024,
        ..AppConfig::default()
    };
    let server = TestServer::new(app(AppState::new(config))).unwrap();

    let resp = server
        .post("/api/v1/secrets")
        .json(&json!({"encryptedSecret": "A".repeat(4096), "expiration": 60}))
        .await;
    resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

// ─── Files ──────────────────────────────────────────────────

#[tokio::test]
async fn test_file_flow() {
    let server = test_server(None);

    let resp = server
        .post("/api/v1/files")
        .json(&json!({
            "encryptedSecret": "AgABAgMEBQYHCAkKCw==",
            "expiration": 600,
            "metadata": {
                "originalFilename": "report.pdf",
                "contentType": "application/pdf",
                "iv": "AAECAwQFBgcICQoL"
            }
        }))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let id = resp.json::<Value>()["id"].as_str().unwrap().to_string();

    let resp = server.get(&format!("/api/v1/files/{id}")).await;
    resp.assert_status_ok();
    assert_eq!(resp.header("cache-control"), "no-store");
    let body: Value = resp.json();
    assert_eq!(body["encryptedSecret"], "AgABAgMEBQYHCAkKCw==");
    assert_eq!(body["metadata"]["originalFilename"], "report.pdf");
    assert_eq!(body["metadata"]["contentType"], "application/pdf");
    assert_eq!(body["metadata"]["iv"], "AAECAwQFBgcICQoL");

    server
        .get(&format!("/api/v1/files/{id}"))
        .await
        .assert_status_not_found();
}
