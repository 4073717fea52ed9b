/// Action-level authorization
///
/// The permission model is deliberately flat:
///
/// 1. **Session**: every organization-scoped call needs an authenticated
///    caller (enforced by the [`AuthContext`](super::middleware::AuthContext)
///    extractor before these checks run)
/// 2. **Membership**: reading or changing an organization's membership
///    requires the caller to be a member of it, in any role
/// 3. **Owner grant**: `owner` is only ever granted by organization creation;
///    no caller can hand it out afterwards
///
/// # Example
///
/// ```no_run
/// use itdoc_shared::auth::authorization::{require_assignable_role, require_membership};
/// use itdoc_shared::models::membership::OrganizationRole;
/// use sqlx::SqlitePool;
/// use uuid::Uuid;
///
/// async fn check(pool: &SqlitePool, org_id: Uuid, caller: Uuid) -> Result<(), Box<dyn std::error::Error>> {
///     require_membership(pool, org_id, caller).await?;
///     require_assignable_role(OrganizationRole::Member)?;
///     Ok(())
/// }
/// ```

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::membership::{Membership, OrganizationRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller is not a member of the organization
    #[error("Not a member of organization {0}")]
    NotMember(Uuid),

    /// Caller tried to grant the owner role
    #[error("The owner role cannot be assigned")]
    OwnerNotAssignable,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks that a user belongs to an organization
///
/// Returns the user's role on success.
///
/// # Errors
///
/// `AuthzError::NotMember` if there is no membership row. A missing
/// organization is indistinguishable from a foreign one.
pub async fn require_membership(
    pool: &SqlitePool,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<OrganizationRole, AuthzError> {
    Membership::get_role(pool, organization_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(organization_id))
}

/// Checks that a role may be granted through the membership API
pub fn require_assignable_role(role: OrganizationRole) -> Result<(), AuthzError> {
    match role {
        OrganizationRole::Owner => Err(AuthzError::OwnerNotAssignable),
        OrganizationRole::Member => Ok(()),
    }
}
