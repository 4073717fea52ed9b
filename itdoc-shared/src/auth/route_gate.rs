/// Route-level access gate
///
/// Evaluated on every request before any handler runs. The decision depends
/// only on whether the request carries a valid session and on which class the
/// path falls into:
///
/// | Path                  | Unauthenticated          | Authenticated          |
/// |-----------------------|--------------------------|------------------------|
/// | `/auth...`            | pass                     | redirect `/dashboard`  |
/// | `/api...`             | pass                     | pass                   |
/// | `/`                   | pass                     | pass                   |
/// | anything else         | redirect to login        | pass                   |
///
/// API routes are never redirected: they answer 401 themselves.

/// Login page
pub const LOGIN_PATH: &str = "/auth/login";

/// Where signed-in users land
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Query parameter carrying the page to return to after login
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Classification of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Login / registration pages
    Auth,

    /// JSON API
    Api,

    /// The public landing page `/`
    Public,

    /// Everything else (dashboard pages)
    Protected,
}

impl RouteClass {
    /// Classifies a request path
    pub fn of(path: &str) -> Self {
        if path.starts_with("/auth") {
            RouteClass::Auth
        } else if path.starts_with("/api") {
            RouteClass::Api
        } else if path == "/" {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }
}

/// Outcome of the route gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Let the request through unchanged
    Pass,

    /// Redirect to the given location
    Redirect(String),
}

/// Decides what to do with a request
///
/// Pure function of session validity and path.
pub fn decide(authenticated: bool, path: &str) -> RouteDecision {
    match (authenticated, RouteClass::of(path)) {
        (false, RouteClass::Protected) => RouteDecision::Redirect(login_location(path)),
        (true, RouteClass::Auth) => RouteDecision::Redirect(DASHBOARD_PATH.to_string()),
        _ => RouteDecision::Pass,
    }
}

/// Builds `/auth/login?callbackUrl=<path>`
///
/// The path is percent-encoded with `/` left literal, so `&`, `=`, `?`,
/// `#`, `+`, `%` and non-ASCII bytes cannot leak into the login query.
pub fn login_location(path: &str) -> String {
    let escaped = urlencoding::encode(path).replace("%2F", "/");
    format!("{}?{}={}", LOGIN_PATH, CALLBACK_PARAM, escaped)
}
