/// Database models for itdoc
///
/// Row types and their SQL. Every function takes an explicit executor (a
/// pool, or a connection borrowed from a transaction) so callers decide the
/// transactional boundary.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `organization`: Tenants owning documentation
/// - `membership`: User-organization relationships with a role
///
/// # Example
///
/// ```no_run
/// use itdoc_shared::models::user::{User, CreateUser};
/// use itdoc_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let new_user = CreateUser {
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     image: None,
///     role: "user".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod organization;
pub mod user;
