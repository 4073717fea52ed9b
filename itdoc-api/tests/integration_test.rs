/// Integration tests for the itdoc API
///
/// These tests drive the full router end-to-end against an in-memory
/// database:
/// - Registration, login, logout and session lookup
/// - Organization creation and listing
/// - Membership endpoints and their authorization rules
/// - Route gate redirects and security headers

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{request, TestContext};
use itdoc_shared::models::user::User;
use serde_json::json;

#[tokio::test]
async fn test_registration_and_organization_scenario() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.register("Alice", "a@x.com").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User created successfully");
    assert_eq!(response.body["user"]["email"], "a@x.com");
    assert!(response.body["user"].get("password_hash").is_none());

    let response = ctx.register("Alice", "a@x.com").await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let token = ctx.login("a@x.com").await;

    let response = ctx
        .post("/api/organizations", json!({ "name": "Acme" }), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["organization"]["name"], "Acme");

    let response = ctx.get("/api/organizations", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let organizations = response.body["organizations"].as_array().unwrap();
    assert_eq!(organizations.len(), 1);
    assert_eq!(organizations[0]["name"], "Acme");
    assert_eq!(organizations[0]["role"], "owner");
}

#[tokio::test]
async fn test_register_validation_returns_field_issues() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post(
            "/api/auth/register",
            json!({ "name": "A", "email": "nope", "password": "short" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");

    let fields: Vec<&str> = response.body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);

    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_missing_fields_is_validation_error() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post("/api/auth/register", json!({ "email": "a@x.com" }), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["issues"].as_array().unwrap().len() >= 2);
}

/// Sends a raw POST body to the register endpoint
async fn post_raw_register(ctx: &TestContext, content_type: &str, body: &str) -> common::TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    ctx.send(request).await
}

fn assert_body_issue(response: &common::TestResponse) {
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {}", response.body);
    assert_eq!(response.body["error"], "validation_error");

    let issues = response.body["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["field"], "body");
    assert!(!issues[0]["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_bodies_are_validation_errors() {
    let ctx = TestContext::new().await.unwrap();

    // Wrong field type
    let response = post_raw_register(
        &ctx,
        "application/json",
        r#"{"name": 5, "email": "a@x.com", "password": "password1"}"#,
    )
    .await;
    assert_body_issue(&response);

    // Not JSON at all
    let response = post_raw_register(&ctx, "application/json", "{\"name\": ").await;
    assert_body_issue(&response);

    // Missing content type
    let response = post_raw_register(
        &ctx,
        "text/plain",
        r#"{"name": "Alice", "email": "a@x.com", "password": "password1"}"#,
    )
    .await;
    assert_body_issue(&response);

    assert_eq!(User::count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_member_role_is_validation_error() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signed_in("Alice", "a@x.com").await;
    ctx.register("Bob", "b@x.com").await;
    let org_id = ctx.create_organization(&alice, "Acme").await;

    let response = ctx
        .post(
            &format!("/api/organizations/{}/members", org_id),
            json!({ "email": "b@x.com", "role": "admin" }),
            Some(&alice),
        )
        .await;
    assert_body_issue(&response);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new().await.unwrap();
    ctx.register("Alice", "a@x.com").await;

    let wrong_password = ctx
        .post(
            "/api/auth/login",
            json!({ "email": "a@x.com", "password": "password2" }),
            None,
        )
        .await;
    let unknown_email = ctx
        .post(
            "/api/auth/login",
            json!({ "email": "b@x.com", "password": "password1" }),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let ctx = TestContext::new().await.unwrap();
    ctx.register("Alice", "a@x.com").await;

    let response = ctx
        .post(
            "/api/auth/login",
            json!({ "email": "a@x.com", "password": "password1" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.header(header::SET_COOKIE).unwrap();
    let token = response.body["token"].as_str().unwrap();
    assert!(cookie.starts_with(&format!("itdoc_session={};", token)));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));

    // The cookie alone authenticates
    let response = ctx
        .send(
            Request::builder()
                .uri("/api/auth/session")
                .header(header::COOKIE, format!("itdoc_session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["name"], "Alice");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.post("/api/auth/logout", json!({}), None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.header(header::SET_COOKIE).unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_organization_routes_require_session() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.get("/api/organizations", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .post("/api/organizations", json!({ "name": "Acme" }), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.get("/api/organizations", Some("garbage.token.value")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.get("/api/auth/session", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_organization_validation() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signed_in("Alice", "a@x.com").await;

    let response = ctx
        .post("/api/organizations", json!({ "name": "A" }), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["issues"][0]["field"], "name");
}

#[tokio::test]
async fn test_session_for_deleted_user_cannot_create_organization() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signed_in("Alice", "a@x.com").await;

    let alice = User::find_by_email(&ctx.db, "a@x.com").await.unwrap().unwrap();
    User::delete(&ctx.db, alice.id).await.unwrap();

    let response = ctx
        .post("/api/organizations", json!({ "name": "Acme" }), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_members_endpoints() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.signed_in("Alice", "a@x.com").await;
    let bob = ctx.signed_in("Bob", "b@x.com").await;
    let org_id = ctx.create_organization(&alice, "Acme").await;
    let members_uri = format!("/api/organizations/{}/members", org_id);

    // Bob is not a member yet
    let response = ctx.get(&members_uri, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Owner cannot be granted
    let response = ctx
        .post(&members_uri, json!({ "email": "b@x.com", "role": "owner" }), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Unknown user
    let response = ctx
        .post(&members_uri, json!({ "email": "c@x.com" }), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx
        .post(&members_uri, json!({ "email": "b@x.com" }), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["membership"]["role"], "member");

    let response = ctx
        .post(&members_uri, json!({ "email": "b@x.com" }), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // Bob can now read the member list
    let response = ctx.get(&members_uri, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::OK);

    let members = response.body["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["email"], "a@x.com");
    assert_eq!(members[0]["org_role"], "owner");
    assert_eq!(members[1]["email"], "b@x.com");
    assert_eq!(members[1]["org_role"], "member");

    let response = ctx.get("/api/organizations", Some(&bob)).await;
    assert_eq!(response.body["organizations"][0]["role"], "member");
}

#[tokio::test]
async fn test_members_of_unknown_organization_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signed_in("Alice", "a@x.com").await;

    let uri = format!("/api/organizations/{}/members", uuid::Uuid::new_v4());
    let response = ctx.get(&uri, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_route_gate_redirects() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.signed_in("Alice", "a@x.com").await;

    let response = ctx.get("/dashboard", None).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header(header::LOCATION),
        Some("/auth/login?callbackUrl=/dashboard")
    );

    let response = ctx.get("/auth/login", Some(&token)).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION), Some("/dashboard"));

    // Expired or forged sessions count as signed out
    let response = ctx.get("/dashboard", Some("forged")).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);

    // Signed in users reach unknown pages and get a plain 404
    let response = ctx.get("/dashboard", Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_routes_pass_through() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "itdoc");

    let response = ctx.get("/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"], "connected");

    // Unauthenticated auth pages are not redirected
    let response = ctx.get("/auth/login", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let ctx = TestContext::new().await.unwrap();

    for response in [
        ctx.get("/", None).await,
        ctx.get("/dashboard", None).await,
        ctx.get("/api/organizations", None).await,
    ] {
        assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
        assert_eq!(response.header(header::X_FRAME_OPTIONS), Some("DENY"));
        assert!(response.header(header::STRICT_TRANSPORT_SECURITY).is_none());
    }
}

#[tokio::test]
async fn test_production_marks_cookie_secure() {
    let mut config = common::test_config();
    config.api.production = true;
    let ctx = TestContext::with_config(config).await.unwrap();
    ctx.register("Alice", "a@x.com").await;

    let response = ctx
        .send(request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "a@x.com", "password": "password1" })),
            None,
        ))
        .await;

    assert!(response.header(header::SET_COOKIE).unwrap().contains("Secure"));
    assert!(response.header(header::STRICT_TRANSPORT_SECURITY).is_some());
}
