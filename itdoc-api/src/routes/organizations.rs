/// Organization endpoints
///
/// Every handler here requires a session. Membership endpoints additionally
/// require the caller to belong to the organization.
///
/// # Endpoints
///
/// ```text
/// POST /api/organizations              { "name": "Acme", "industry": "MSP" }
/// GET  /api/organizations
/// GET  /api/organizations/:id/members
/// POST /api/organizations/:id/members  { "email": "b@x.com", "role": "member" }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use itdoc_shared::auth::authorization::{require_assignable_role, require_membership};
use itdoc_shared::auth::middleware::AuthContext;
use itdoc_shared::error::field_issues;
use itdoc_shared::models::membership::{Membership, OrganizationMember, OrganizationRole};
use itdoc_shared::models::organization::{Organization, OrganizationWithRole};
use itdoc_shared::stores::NewOrganization;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create organization response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrganizationResponse {
    pub message: String,
    pub organization: Organization,
}

/// List organizations response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListOrganizationsResponse {
    pub organizations: Vec<OrganizationWithRole>,
}

/// List members response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListMembersResponse {
    pub members: Vec<OrganizationMember>,
}

/// Add member request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AddMemberRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Role to grant (default: member)
    pub role: OrganizationRole,
}

/// Add member response
#[derive(Debug, Serialize, Deserialize)]
pub struct AddMemberResponse {
    pub membership: Membership,
}

/// Creates an organization owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: No session
/// - `500 Internal Server Error`: Server error
pub async fn create_organization(
    auth: AuthContext,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewOrganization>,
) -> ApiResult<(StatusCode, Json<CreateOrganizationResponse>)> {
    let organization = state
        .organizations
        .create_organization_with_owner(auth.user_id, req)
        .await?;

    info!(
        organization_id = %organization.id,
        user_id = %auth.user_id,
        "Organization created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOrganizationResponse {
            message: "Organization created successfully".to_string(),
            organization,
        }),
    ))
}

/// Lists the caller's organizations with the caller's role in each
pub async fn list_organizations(
    auth: AuthContext,
    State(state): State<AppState>,
) -> ApiResult<Json<ListOrganizationsResponse>> {
    let organizations = state
        .organizations
        .list_organizations_for_user(auth.user_id)
        .await?;

    Ok(Json(ListOrganizationsResponse { organizations }))
}

/// Lists an organization's members
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member (also for unknown organizations)
pub async fn list_members(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> ApiResult<Json<ListMembersResponse>> {
    require_membership(&state.db, organization_id, auth.user_id).await?;

    let members = state
        .organizations
        .list_members_for_organization(organization_id)
        .await?;

    Ok(Json(ListMembersResponse { members }))
}

/// Adds an existing user to an organization by email
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email
/// - `403 Forbidden`: Caller is not a member, or tried to grant `owner`
/// - `404 Not Found`: No user with that email
/// - `409 Conflict`: User is already a member
pub async fn add_member(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    ApiJson(req): ApiJson<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<AddMemberResponse>)> {
    require_membership(&state.db, organization_id, auth.user_id).await?;
    require_assignable_role(req.role)?;

    req.validate()
        .map_err(|e| ApiError::ValidationError(field_issues(&e)))?;

    let user = state
        .credentials
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No user with this email".to_string()))?;

    let membership = state
        .organizations
        .add_membership(user.id, organization_id, req.role)
        .await?;

    info!(
        organization_id = %organization_id,
        user_id = %user.id,
        added_by = %auth.user_id,
        "Member added"
    );

    Ok((StatusCode::CREATED, Json(AddMemberResponse { membership })))
}
