/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use itdoc_api::{app::AppState, config::Config};
/// use itdoc_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = itdoc_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::{security::SecurityHeadersLayer, session::session_gate},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use itdoc_shared::auth::session::{JwtSessionIssuer, SessionIssuer};
use itdoc_shared::stores::{CredentialStore, OrganizationStore};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is a pool handle or an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Session token issuer
    pub sessions: Arc<dyn SessionIssuer>,

    /// User registration and login
    pub credentials: CredentialStore,

    /// Organizations and memberships
    pub organizations: OrganizationStore,
}

impl AppState {
    /// Creates new application state with a JWT session issuer
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let sessions = JwtSessionIssuer::new(config.session.secret.clone(), config.session_ttl());
        Self::with_session_issuer(db, config, Arc::new(sessions))
    }

    /// Creates new application state with an explicit session issuer
    pub fn with_session_issuer(
        db: SqlitePool,
        config: Config,
        sessions: Arc<dyn SessionIssuer>,
    ) -> Self {
        let credentials = CredentialStore::with_hash_params(db.clone(), config.password.hash_params());
        let organizations = OrganizationStore::new(db.clone());

        Self {
            db,
            config: Arc::new(config),
            sessions,
            credentials,
            organizations,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /                                   # Service banner (public)
/// /api/
/// ├── GET  /health                    # Health check (public)
/// ├── /auth/
/// │   ├── POST /register
/// │   ├── POST /login
/// │   ├── POST /logout
/// │   └── GET  /session               # Current user (session)
/// └── /organizations/                 # All require a session
///     ├── POST /                      # Create, caller becomes owner
///     ├── GET  /                      # Caller's organizations
///     ├── GET  /:id/members           # Members only
///     └── POST /:id/members           # Members only
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Session gate: resolves the session and applies the route redirects
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/register", axum::routing::post(routes::auth::register))
        .route("/login", axum::routing::post(routes::auth::login))
        .route("/logout", axum::routing::post(routes::auth::logout))
        .route("/session", get(routes::auth::session));

    let organization_routes = Router::new()
        .route(
            "/",
            get(routes::organizations::list_organizations)
                .post(routes::organizations::create_organization),
        )
        .route(
            "/:id/members",
            get(routes::organizations::list_members).post(routes::organizations::add_member),
        );

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/organizations", organization_routes);

    let cors = if state.config.api.cors_origins.is_empty() {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/", get(routes::health::index))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}
