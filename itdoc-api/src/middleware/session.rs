/// Session gate middleware
///
/// Runs on every request. Resolves the session token (cookie or bearer
/// header) into an [`AuthContext`], applies the route-level redirect rules,
/// and on pass-through leaves the context in the request extensions for
/// handlers to extract.
///
/// An invalid or expired token is treated exactly like no token.

use crate::app::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use itdoc_shared::auth::middleware::{authenticate, AuthError};
use itdoc_shared::auth::route_gate::{decide, RouteDecision};
use tracing::debug;

pub async fn session_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let auth = match authenticate(state.sessions.as_ref(), req.headers()) {
        Ok(ctx) => Some(ctx),
        Err(AuthError::MissingCredentials) => None,
        Err(e) => {
            debug!(error = %e, "Ignoring invalid session");
            None
        }
    };

    let path = req.uri().path().to_string();

    match decide(auth.is_some(), &path) {
        RouteDecision::Redirect(location) => {
            debug!(%path, %location, "Route gate redirect");
            Redirect::temporary(&location).into_response()
        }
        RouteDecision::Pass => {
            if let Some(ctx) = auth {
                req.extensions_mut().insert(ctx);
            }
            next.run(req).await
        }
    }
}
