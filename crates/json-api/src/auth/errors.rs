//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::auth::AuthServiceError;

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::AlreadyExists => StatusError::bad_request().brief("User already exists"),
        AuthServiceError::InvalidCredentials
        | AuthServiceError::InvalidToken(_)
        | AuthServiceError::UnknownIdentity => StatusError::unauthorized().brief(INVALID_CREDENTIALS),
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error().detail(source.to_string())
        }
        AuthServiceError::Token(source) => {
            error!("failed to issue identity token: {source}");

            StatusError::internal_server_error().detail(source.to_string())
        }
        AuthServiceError::Sql(source) => {
            error!("failed to query users: {source}");

            StatusError::internal_server_error().detail(source.to_string())
        }
    }
}
