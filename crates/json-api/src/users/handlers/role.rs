//! Update User Role Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::users::records::{Role, UserUuid};

use crate::{
    envelope::Envelope, extensions::*, state::State, users::errors::into_status_error,
    users::index::UserResponse,
};

/// Update Role Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateRoleRequest {
    /// `Admin` or `User`
    pub role: String,
}

/// Update User Role Handler
#[endpoint(
    tags("admin"),
    summary = "Update User Role",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Role updated"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateRoleRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<UserResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = id.into_inner().parse::<UserUuid>().or_400("Invalid user ID")?;
    let role = json
        .into_inner()
        .role
        .parse::<Role>()
        .or_400("Invalid role. Must be 'Admin' or 'User'")?;

    let user = state
        .app
        .users
        .update_role(user, role)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %user.uuid, role = %user.role, "updated user role");

    Ok(Envelope::ok("User role updated successfully", user.into()))
}
