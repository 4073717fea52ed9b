/// Middleware modules for the API server
///
/// - `security`: Security response headers
/// - `session`: Session resolution and the route-level gate

pub mod security;
pub mod session;
