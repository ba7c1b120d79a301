//! Auth Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use storefront_app::auth::AuthSession;

use crate::users::index::UserResponse;

pub(crate) mod current;
pub(crate) mod login;
pub(crate) mod register;

/// Signed-in user plus the bearer token to send on later requests.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// Always `true`
    pub success: bool,

    /// Human readable outcome
    pub message: String,

    /// The signed-in user
    pub data: UserResponse,

    /// Identity token for the `Authorization: Bearer` header
    pub token: String,
}

impl SessionResponse {
    pub(crate) fn new(message: &str, session: AuthSession) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: session.user.into(),
            token: session.token,
        }
    }
}
