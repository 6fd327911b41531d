//! HTTP tests for the user API.
//!
//! Drive the full router with in-memory store and cache backends.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use roster_config::ServerConfig;
use roster_core::UserId;
use roster_repository::{InMemoryUserRepository, UserRepository};
use roster_rest::{create_router, AppState};
use roster_service::{CacheInterface, InMemoryCache, UserServiceImpl};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct TestApp {
    router: Router,
    repo: Arc<InMemoryUserRepository>,
    cache: Arc<InMemoryCache>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(&ServerConfig::default())
    }

    fn with_config(config: &ServerConfig) -> Self {
        let repo = Arc::new(InMemoryUserRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let service = Arc::new(UserServiceImpl::new(repo.clone(), cache.clone()));
        let router = create_router(AppState::new(service), config);

        Self { router, repo, cache }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create(&self, name: &str, email: &str) -> Value {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/users",
                Some(json!({"name": name, "email": email})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

#[tokio::test]
async fn test_create_get_delete_flow() {
    let app = TestApp::new();

    let created = app.create("Alice Smith", "alice@example.com").await;
    assert_eq!(
        created,
        json!({"id": 1, "name": "Alice Smith", "email": "alice@example.com"})
    );
    assert!(app.cache.exists("user:1").await.unwrap());

    let (status, fetched) = app.send_json(Method::GET, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = app.send(Method::DELETE, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert!(!app.cache.exists("user:1").await.unwrap());

    let (status, error) = app.send_json(Method::GET, "/api/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new();

    let (status, empty) = app.send_json(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));

    app.create("Alice Smith", "alice@example.com").await;
    app.create("Bob Jones", "bob@example.com").await;

    let (status, users) = app.send_json(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert_eq!(users[0]["name"], "Alice Smith");
    assert_eq!(users[1]["id"], 2);
}

#[tokio::test]
async fn test_create_invalid_fields() {
    let app = TestApp::new();

    let (status, error) = app
        .send_json(
            Method::POST,
            "/api/users",
            Some(json!({"name": "A1", "email": "x"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = error["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_missing_field() {
    let app = TestApp::new();

    let (status, error) = app
        .send_json(Method::POST, "/api/users", Some(json!({"name": "Alice Smith"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_create_null_fields() {
    let app = TestApp::new();

    let (status, error) = app
        .send_json(
            Method::POST,
            "/api/users",
            Some(json!({"name": null, "email": null})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = error["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_duplicate_email() {
    let app = TestApp::new();
    app.create("Alice Smith", "alice@example.com").await;

    let (status, error) = app
        .send_json(
            Method::POST,
            "/api/users",
            Some(json!({"name": "Alice Other", "email": "alice@example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");
    assert_eq!(app.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_body_id_is_ignored() {
    let app = TestApp::new();

    let (status, created) = app
        .send_json(
            Method::POST,
            "/api/users",
            Some(json!({"id": 99, "name": "Alice Smith", "email": "alice@example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn test_update_user() {
    let app = TestApp::new();
    app.create("Alice Smith", "alice@example.com").await;

    let (status, updated) = app
        .send_json(
            Method::PUT,
            "/api/users/1",
            Some(json!({"name": "Alice Jones", "email": "jones@example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({"id": 1, "name": "Alice Jones", "email": "jones@example.com"})
    );

    let stored = app.repo.find_by_id(UserId::new(1)).await.unwrap().unwrap();
    assert_eq!(stored.name, "Alice Jones");
}

#[tokio::test]
async fn test_update_missing_user() {
    let app = TestApp::new();

    let (status, _) = app
        .send_json(
            Method::PUT,
            "/api/users/42",
            Some(json!({"name": "Alice Jones", "email": "jones@example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_invalid_fields() {
    let app = TestApp::new();
    app.create("Alice Smith", "alice@example.com").await;

    let (status, error) = app
        .send_json(
            Method::PUT,
            "/api/users/1",
            Some(json!({"name": "Alice Smith", "email": "nope"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_delete_missing_user() {
    let app = TestApp::new();
    let (status, error) = app.send_json(Method::DELETE, "/api/users/5", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_numeric_id() {
    let app = TestApp::new();
    let (status, error) = app.send_json(Method::GET, "/api/users/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_user_health_text() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/users/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Application is running with Docker Compose integration!"
    );
}

#[tokio::test]
async fn test_service_health() {
    let app = TestApp::new();
    let (status, body) = app.send_json(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "UP"}));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = TestApp::new();
    let (status, doc) = app.send_json(Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/users/{id}"].is_object());
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/users/health")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_custom_prefix() {
    let config = ServerConfig {
        api_prefix: "/v2/".to_string(),
        ..ServerConfig::default()
    };
    let app = TestApp::with_config(&config);

    let (status, _) = app.send(Method::GET, "/v2/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_logs_id_not_email() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new();
    let user = app.create("Alice Smith", "alice@example.com").await;

    let output = logs.contents();
    assert!(output.contains(&format!("User created: {}", user["id"])));
    assert!(!output.contains("alice@example.com"));
}
