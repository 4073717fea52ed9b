/// Session issuer
///
/// The rest of the system only needs two things from the session layer:
/// turn an authenticated user into an opaque token, and turn a token back
/// into a user ID (or reject it). [`SessionIssuer`] is that seam;
/// [`JwtSessionIssuer`] is the signed-JWT implementation used by the server.

use chrono::Duration;
use uuid::Uuid;

use super::jwt::{self, Claims, JwtError};
use crate::models::user::User;

/// Default session lifetime (30 days)
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 30;

/// Issues and verifies opaque session tokens
pub trait SessionIssuer: Send + Sync {
    /// Issues a token bound to `user`
    fn issue(&self, user: &User) -> Result<String, JwtError>;

    /// Verifies a token and returns the claims it carries
    fn verify(&self, token: &str) -> Result<Claims, JwtError>;

    /// Verifies a token and returns only the bound user ID
    fn verify_user_id(&self, token: &str) -> Result<Uuid, JwtError> {
        self.verify(token).map(|claims| claims.sub)
    }
}

/// HS256 JWT session issuer
#[derive(Clone)]
pub struct JwtSessionIssuer {
    secret: String,
    ttl: Duration,
}

impl JwtSessionIssuer {
    /// Creates an issuer signing with `secret`, tokens valid for `ttl`
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

impl std::fmt::Debug for JwtSessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, user: &User) -> Result<String, JwtError> {
        let claims = Claims::new(user.id, user.email.clone(), user.name.clone(), self.ttl);
        jwt::create_token(&claims, &self.secret)
    }

    fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        jwt::validate_token(token, &self.secret)
    }
}
