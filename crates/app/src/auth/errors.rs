//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::{password::PasswordError, token::TokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity token rejected")]
    InvalidToken(#[source] TokenError),

    #[error("token subject no longer exists")]
    UnknownIdentity,

    #[error("user already exists")]
    AlreadyExists,

    #[error("password processing error")]
    Password(#[from] PasswordError),

    #[error("failed to issue identity token")]
    Token(#[source] TokenError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            _ => Self::Sql(error),
        }
    }
}
