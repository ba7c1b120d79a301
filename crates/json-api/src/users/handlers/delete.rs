//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::domain::users::records::UserUuid;

use crate::{
    envelope::MessageResponse, extensions::*, state::State, users::errors::into_status_error,
};

/// Delete User Handler
///
/// Admins cannot delete their own account.
#[endpoint(
    tags("admin"),
    summary = "Delete User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.identity_or_401()?.uuid;
    let user = id.into_inner().parse::<UserUuid>().or_400("Invalid user ID")?;

    state
        .app
        .users
        .delete_user(actor, user)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %user, actor_uuid = %actor, "deleted user");

    Ok(MessageResponse::ok("User deleted successfully"))
}
