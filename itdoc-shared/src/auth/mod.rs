/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed session token encoding and validation
/// - [`session`]: The session issuer seam (`issue` / `verify`)
/// - [`middleware`]: Token extraction and the authenticated-request extractor
/// - [`route_gate`]: Per-request redirect decision for page routes
/// - [`authorization`]: Per-action membership checks
///
/// # Example
///
/// ```
/// use itdoc_shared::auth::password::{hash_password, verify_password};
/// use itdoc_shared::auth::route_gate::{decide, RouteDecision};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("password1")?;
/// assert!(verify_password("password1", &hash)?);
///
/// assert_eq!(decide(false, "/"), RouteDecision::Pass);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod route_gate;
pub mod session;
