/// Session extraction for Axum
///
/// Requests authenticate with a session token carried either in the
/// `itdoc_session` cookie (browser) or in an `Authorization: Bearer <token>`
/// header (scripts). [`authenticate`] resolves whichever is present into an
/// [`AuthContext`]; the server's gate middleware stores that context in the
/// request extensions and handlers pull it back out with the
/// [`AuthContext`] extractor.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use itdoc_shared::auth::middleware::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, {}!", auth.name)
/// }
///
/// let app: Router = Router::new().route("/api/me", get(protected_handler));
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{Claims, JwtError};
use super::session::SessionIssuer;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "itdoc_session";

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email at the time the session was issued
    pub email: String,

    /// Display name at the time the session was issued
    pub name: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Error type for session authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session token on the request
    #[error("Missing credentials")]
    MissingCredentials,

    /// Session token present but rejected
    #[error("Invalid session: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Pulls the raw session token off a request
///
/// The cookie wins when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Resolves the request's session into an [`AuthContext`]
///
/// # Errors
///
/// `MissingCredentials` when no token is present, `InvalidToken` when the
/// issuer rejects it (bad signature, expired, foreign issuer).
pub fn authenticate(
    issuer: &dyn SessionIssuer,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers).ok_or(AuthError::MissingCredentials)?;

    let claims = issuer.verify(&token).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Session expired".to_string()),
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    Ok(claims.into())
}

/// Builds a `Set-Cookie` value carrying `token`
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds a `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}
