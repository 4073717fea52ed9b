/// Organization model and database operations
///
/// Organizations are the tenants of itdoc: every asset, document and stored
/// password belongs to exactly one. Users reach an organization only through
/// a membership row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL,
///     industry TEXT,
///     logo TEXT,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// Names are not unique; the ID is the only stable reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use super::membership::OrganizationRole;

/// Organization row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Unique organization ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional industry tag
    pub industry: Option<String>,

    /// Optional logo reference
    pub logo: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An organization as seen by one of its members
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrganizationWithRole {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub organization: Organization,

    /// The member's role in this organization
    #[sqlx(try_from = "String")]
    pub role: OrganizationRole,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Default)]
pub struct CreateOrganization {
    pub name: String,
    pub industry: Option<String>,
    pub logo: Option<String>,
}

impl Organization {
    /// Inserts a new organization row
    ///
    /// Pass `&mut *tx` to make the insert part of a larger transaction.
    pub async fn create<'e, E>(executor: E, data: CreateOrganization) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (id, name, industry, logo, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, industry, logo, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.industry)
        .bind(data.logo)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
    }

    /// Finds an organization by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, industry, logo, created_at, updated_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists the organizations a user belongs to, with the user's role in each
    ///
    /// The (organization, user) pair is unique, so each organization appears
    /// at most once. Ordered by creation time.
    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<OrganizationWithRole>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, OrganizationWithRole>(
            r#"
            SELECT o.id, o.name, o.industry, o.logo, o.created_at, o.updated_at, ou.role
            FROM organizations o
            JOIN organization_users ou ON o.id = ou.organization_id
            WHERE ou.user_id = ?
            ORDER BY o.created_at, o.rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Deletes an organization
    ///
    /// Memberships (and every organization-scoped document table) cascade.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
