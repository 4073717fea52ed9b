/// Authentication endpoints
///
/// - `POST /api/auth/register`: create an account
/// - `POST /api/auth/login`: exchange email + password for a session
/// - `POST /api/auth/logout`: clear the session cookie
/// - `GET  /api/auth/session`: the user behind the current session
///
/// Sessions are stateless signed tokens. Login hands the token back both as
/// the `itdoc_session` cookie and in the body for non-browser clients;
/// logout only clears the cookie.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use itdoc_shared::auth::middleware::{clear_session_cookie, session_cookie, AuthContext};
use itdoc_shared::error::field_issues;
use itdoc_shared::models::user::PublicUser;
use itdoc_shared::stores::NewUser;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: PublicUser,

    /// Session token, also set as a cookie
    pub token: String,
}

/// Current session response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: PublicUser,
}

/// Registration endpoint
///
/// # Request
///
/// ```json
/// { "name": "Alice", "email": "a@x.com", "password": "password1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, with one issue per field
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewUser>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let user = state.credentials.create_user(req).await?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Login endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()
        .map_err(|e| ApiError::ValidationError(field_issues(&e)))?;

    let user = state
        .credentials
        .authenticate(&req.email, &req.password)
        .await?
        .ok_or_else(|| {
            warn!("Rejected login attempt");
            ApiError::Unauthorized("Invalid email or password".to_string())
        })?;

    let token = state.sessions.issue(&user)?;
    let cookie = session_cookie(
        &token,
        state.config.session_ttl().num_seconds(),
        state.config.api.production,
    );

    info!(user_id = %user.id, "User logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Logout endpoint
///
/// Always succeeds. The token itself stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie(state.config.api.production))],
    )
}

/// Current session endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: No session, or the session's user no longer exists
pub async fn session(
    auth: AuthContext,
    State(state): State<AppState>,
) -> ApiResult<Json<SessionResponse>> {
    let user = state
        .credentials
        .get_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;

    Ok(Json(SessionResponse { user: user.into() }))
}
