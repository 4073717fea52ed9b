/// Membership model and database operations
///
/// The `organization_users` join table links users to organizations with a
/// role scoped to that organization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organization_users (
///     id BLOB PRIMARY KEY NOT NULL,
///     organization_id BLOB NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role TEXT NOT NULL DEFAULT 'member',
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL,
///     UNIQUE (organization_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: granted to the creator of the organization, never self-assigned
/// - **member**: everyone else
///
/// Authorization does not go further than "is a member"; the role is
/// recorded and reported but no action is restricted to owners beyond
/// creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a user inside one organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationRole {
    /// Creator of the organization
    Owner,

    /// Regular member
    #[default]
    Member,
}

impl OrganizationRole {
    /// Converts role to its stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationRole::Owner => "owner",
            OrganizationRole::Member => "member",
        }
    }
}

impl fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored role string that is not a known [`OrganizationRole`]
#[derive(Debug, thiserror::Error)]
#[error("Unknown organization role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for OrganizationRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(OrganizationRole::Owner),
            "member" => Ok(OrganizationRole::Member),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for OrganizationRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,

    #[sqlx(try_from = "String")]
    pub role: OrganizationRole,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member of an organization, joined with the user's profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrganizationMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,

    /// The user's global role tag
    pub global_role: String,

    /// The user's role inside this organization
    #[sqlx(try_from = "String")]
    pub org_role: OrganizationRole,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    pub organization_id: Uuid,
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default)]
    pub role: OrganizationRole,
}

impl Membership {
    /// Inserts a membership row
    ///
    /// # Errors
    ///
    /// Returns a database error carrying:
    /// - a unique violation if the user is already a member
    /// - a foreign-key violation if the user or organization doesn't exist
    pub async fn create<'e, E>(executor: E, data: CreateMembership) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO organization_users (id, organization_id, user_id, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, organization_id, user_id, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.organization_id)
        .bind(data.user_id)
        .bind(data.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
    }

    /// Gets a user's role in an organization, None if not a member
    pub async fn get_role<'e, E>(
        executor: E,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrganizationRole>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let role: Option<String> = sqlx::query_scalar(
            r#"
            SELECT role FROM organization_users
            WHERE organization_id = ? AND user_id = ?
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        role.map(|r| {
            r.parse::<OrganizationRole>()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))
        })
        .transpose()
    }

    /// Lists the members of an organization with their profiles
    pub async fn list_members<'e, E>(
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<OrganizationMember>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, OrganizationMember>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.image,
                   u.role AS global_role, ou.role AS org_role
            FROM users u
            JOIN organization_users ou ON u.id = ou.user_id
            WHERE ou.organization_id = ?
            ORDER BY ou.created_at, ou.rowid
            "#,
        )
        .bind(organization_id)
        .fetch_all(executor)
        .await
    }

    /// Counts members of an organization
    pub async fn count_by_organization<'e, E>(
        executor: E,
        organization_id: Uuid,
    ) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM organization_users WHERE organization_id = ?")
                .bind(organization_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }
}
