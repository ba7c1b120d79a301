//! User Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::users::records::UserRecord;

use crate::{
    envelope::Envelope, extensions::*, pagination, state::State,
    users::errors::into_status_error,
};

/// A user account. Never includes the password digest.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Login email address
    pub email: String,

    /// `Admin` or `User`
    pub role: String,

    /// The date and time the user registered
    pub created_at: String,

    /// The date and time the user was last updated
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            uuid: user.uuid.into(),
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersPage {
    /// Users on this page, newest first
    pub users: Vec<UserResponse>,

    /// Total number of users
    pub total: u64,

    /// Current page number
    pub page: u32,

    /// Number of pages
    pub pages: u64,
}

/// User Index Handler
///
/// Lists every account, newest first.
#[endpoint(
    tags("admin"),
    summary = "List Users",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<UsersPage>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let pagination = pagination::from_query(page, limit)?;

    let users = state
        .app
        .users
        .list_users(pagination)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Users fetched successfully",
        UsersPage {
            users: users.items.into_iter().map(Into::into).collect(),
            total: users.total,
            page: users.page,
            pages: users.pages,
        },
    ))
}
