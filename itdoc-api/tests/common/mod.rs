//! Common test utilities for integration tests
//!
//! Every `TestContext` owns a private in-memory database with migrations
//! applied and a router built on top of it. Requests are driven through the
//! router directly with `tower::Service`; no socket is opened.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use itdoc_api::app::{build_router, AppState};
use itdoc_api::config::{ApiConfig, Config, DatabaseConfig, PasswordConfig, SessionConfig};
use itdoc_shared::db::migrations::run_migrations;
use itdoc_shared::db::pool::{self, create_pool};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec![],
        },
        database: DatabaseConfig {
            url: pool::IN_MEMORY_URL.to_string(),
            max_connections: 1,
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 24,
        },
        // Cheap hashing keeps the suite fast
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
        },
    }
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> anyhow::Result<Self> {
        let db = create_pool(pool::DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, None, token)).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.send(request(Method::POST, uri, Some(body), token)).await
    }

    /// Registers a user with password `password1`
    pub async fn register(&self, name: &str, email: &str) -> TestResponse {
        self.post(
            "/api/auth/register",
            json!({ "name": name, "email": email, "password": "password1" }),
            None,
        )
        .await
    }

    /// Logs in and returns the session token
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .post(
                "/api/auth/login",
                json!({ "email": email, "password": "password1" }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);

        response.body["token"]
            .as_str()
            .expect("token missing from login response")
            .to_string()
    }

    /// Registers then logs in
    pub async fn signed_in(&self, name: &str, email: &str) -> String {
        let response = self.register(name, email).await;
        assert_eq!(response.status, StatusCode::CREATED, "register failed: {}", response.body);
        self.login(email).await
    }

    /// Creates an organization as the token's user and returns its ID
    pub async fn create_organization(&self, token: &str, name: &str) -> String {
        let response = self
            .post("/api/organizations", json!({ "name": name }), Some(token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create failed: {}", response.body);

        response.body["organization"]["id"]
            .as_str()
            .expect("organization id missing")
            .to_string()
    }
}

/// Builds a request, with a bearer token when given
pub fn request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
