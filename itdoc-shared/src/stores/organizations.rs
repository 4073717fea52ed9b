/// Organization store
///
/// Organizations and the membership relation between users and
/// organizations. Creating an organization through
/// [`OrganizationStore::create_organization_with_owner`] writes the
/// organization and the creator's `owner` membership in a single transaction.

use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use super::{is_foreign_key_violation, is_unique_violation};
use crate::error::{field_issues, FieldIssue};
use crate::models::membership::{CreateMembership, Membership, OrganizationMember, OrganizationRole};
use crate::models::organization::{CreateOrganization, Organization, OrganizationWithRole};

/// Organization creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewOrganization {
    #[validate(length(min = 2, message = "Organization name must be at least 2 characters"))]
    pub name: String,

    pub industry: Option<String>,

    pub logo: Option<String>,
}

impl NewOrganization {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn into_create(self) -> CreateOrganization {
        CreateOrganization {
            name: self.name,
            industry: non_empty(self.industry),
            logo: non_empty(self.logo),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Error type for organization operations
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// Input failed validation; nothing was written
    #[error("Validation failed")]
    Validation(Vec<FieldIssue>),

    /// The owning user does not exist
    #[error("Owner {0} does not exist")]
    UnknownOwner(Uuid),

    /// Database failure
    #[error("Store failure: {0}")]
    Store(#[from] sqlx::Error),
}

/// Error type for membership creation
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    /// The user already belongs to the organization
    #[error("User is already a member of this organization")]
    AlreadyMember,

    /// The user or the organization does not exist
    #[error("User or organization does not exist")]
    MissingReference,

    /// Any other database failure
    #[error("Store failure: {0}")]
    Store(sqlx::Error),
}

impl From<sqlx::Error> for MembershipError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            MembershipError::AlreadyMember
        } else if is_foreign_key_violation(&err) {
            MembershipError::MissingReference
        } else {
            MembershipError::Store(err)
        }
    }
}

/// Organization and membership persistence
#[derive(Debug, Clone)]
pub struct OrganizationStore {
    pool: SqlitePool,
}

impl OrganizationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates an organization with no members
    ///
    /// Empty `industry` / `logo` are stored as NULL.
    pub async fn create_organization(
        &self,
        input: NewOrganization,
    ) -> Result<Organization, OrganizationError> {
        input
            .validate()
            .map_err(|e| OrganizationError::Validation(field_issues(&e)))?;

        let organization = Organization::create(&self.pool, input.into_create()).await?;
        debug!(organization_id = %organization.id, "Organization created");

        Ok(organization)
    }

    /// Creates an organization and makes `owner_id` its owner
    ///
    /// Both rows commit together or not at all.
    pub async fn create_organization_with_owner(
        &self,
        owner_id: Uuid,
        input: NewOrganization,
    ) -> Result<Organization, OrganizationError> {
        input
            .validate()
            .map_err(|e| OrganizationError::Validation(field_issues(&e)))?;

        let mut tx = self.pool.begin().await?;

        let organization = Organization::create(&mut *tx, input.into_create()).await?;

        Membership::create(
            &mut *tx,
            CreateMembership {
                organization_id: organization.id,
                user_id: owner_id,
                role: OrganizationRole::Owner,
            },
        )
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                OrganizationError::UnknownOwner(owner_id)
            } else {
                OrganizationError::Store(e)
            }
        })?;

        tx.commit().await?;

        debug!(
            organization_id = %organization.id,
            owner_id = %owner_id,
            "Organization created with owner"
        );

        Ok(organization)
    }

    /// Adds a user to an organization
    ///
    /// # Errors
    ///
    /// - `AlreadyMember` if the pair already exists
    /// - `MissingReference` if either the user or the organization is missing
    /// - `Store` for anything else
    pub async fn add_membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: OrganizationRole,
    ) -> Result<Membership, MembershipError> {
        let membership = Membership::create(
            &self.pool,
            CreateMembership {
                organization_id,
                user_id,
                role,
            },
        )
        .await
        .map_err(|e| {
            let err = MembershipError::from(e);
            if !matches!(err, MembershipError::Store(_)) {
                warn!(%user_id, %organization_id, error = %err, "Membership rejected");
            }
            err
        })?;

        debug!(membership_id = %membership.id, role = %role, "Membership created");

        Ok(membership)
    }

    /// Lists the organizations a user belongs to, with the user's role in each
    ///
    /// Ordered by organization creation time.
    pub async fn list_organizations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OrganizationWithRole>, sqlx::Error> {
        Organization::list_for_user(&self.pool, user_id).await
    }

    /// Lists the members of an organization with their profiles
    pub async fn list_members_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<OrganizationMember>, sqlx::Error> {
        Membership::list_members(&self.pool, organization_id).await
    }

    /// A user's role in an organization, `None` if not a member
    pub async fn membership_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrganizationRole>, sqlx::Error> {
        Membership::get_role(&self.pool, organization_id, user_id).await
    }

    /// Looks up an organization by ID
    pub async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, sqlx::Error> {
        Organization::find_by_id(&self.pool, id).await
    }
}
