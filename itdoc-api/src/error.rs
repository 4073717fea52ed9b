/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; the store-layer error enums
/// convert into it with `?`.
///
/// Internal failures are logged with their detail and answered with a
/// generic message; no storage error text reaches the client.
///
/// # Example
///
/// ```
/// use itdoc_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(name: Option<String>) -> ApiResult<Json<String>> {
///     let name = name.ok_or_else(|| ApiError::NotFound("name".to_string()))?;
///     Ok(Json(name))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use itdoc_shared::auth::authorization::AuthzError;
use itdoc_shared::auth::jwt::JwtError;
use itdoc_shared::auth::middleware::AuthError;
use itdoc_shared::auth::password::PasswordError;
use itdoc_shared::error::FieldIssue;
use itdoc_shared::stores::{CredentialError, MembershipError, OrganizationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Bad request (400) with field-level issues
    ValidationError(Vec<FieldIssue>),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<FieldIssue>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(issues) => {
                write!(f, "Validation failed: {} errors", issues.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, issues) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(issues) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(issues),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            issues,
        });

        (status, body).into_response()
    }
}

/// Database errors that reach the edge are always internal
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(issues) => ApiError::ValidationError(issues),
            CredentialError::EmailConflict => {
                ApiError::Conflict("A user with this email already exists".to_string())
            }
            CredentialError::Password(e) => e.into(),
            CredentialError::Store(e) => e.into(),
        }
    }
}

impl From<OrganizationError> for ApiError {
    fn from(err: OrganizationError) -> Self {
        match err {
            OrganizationError::Validation(issues) => ApiError::ValidationError(issues),
            // The owner is the session user; a missing row means a stale session
            OrganizationError::UnknownOwner(_) => {
                ApiError::Unauthorized("Session user no longer exists".to_string())
            }
            OrganizationError::Store(e) => e.into(),
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::AlreadyMember => {
                ApiError::Conflict("User is already a member of this organization".to_string())
            }
            MembershipError::MissingReference => {
                ApiError::NotFound("User or organization not found".to_string())
            }
            MembershipError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotMember(_) => {
                ApiError::Forbidden("Not a member of this organization".to_string())
            }
            AuthzError::OwnerNotAssignable => {
                ApiError::Forbidden("The owner role cannot be assigned".to_string())
            }
            AuthzError::DatabaseError(e) => e.into(),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Unreadable request bodies are validation failures on the `body` field
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationError(vec![FieldIssue::new("body", rejection.body_text())])
    }
}

/// Only issuing can fail at the edge; verification goes through `AuthError`
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::InternalError(format!("Session issue failed: {}", err))
    }
}
