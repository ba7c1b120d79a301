//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::{auth::NewRegistration, domain::users::records::UserUuid};

use crate::{
    auth::{errors::into_status_error, handlers::SessionResponse},
    extensions::*,
    state::State,
    validation::Violations,
};

/// Register Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    /// Display name, 3 to 70 characters
    pub name: String,

    /// Login email address
    pub email: String,

    /// At least six characters mixing upper case, lower case and digits
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<RegisterRequest> for NewRegistration {
    fn from(request: RegisterRequest) -> Self {
        NewRegistration {
            uuid: UserUuid::new(),
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Register Handler
///
/// Creates a `User` account and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Validation failed or user already exists"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    Violations::new()
        .name(&request.name)
        .email(&request.email)
        .password(&request.password)
        .finish()?;

    let session = state
        .app
        .auth
        .register(request.into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(SessionResponse::new("You have registered", session)))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::{
        auth::{AuthServiceError, AuthSession, MockAuthService},
        domain::users::records::{Role, UserRecord},
    };
    use testresult::TestResult;

    use crate::{
        envelope::ErrorEnvelope,
        test_helpers::{Mocks, service},
    };

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        service(
            Mocks {
                auth,
                ..Mocks::default()
            },
            Router::with_path("register").post(handler),
        )
    }

    fn body() -> serde_json::Value {
        json!({ "name": "Ada Lovelace", "email": "ada@example.com", "password": "Secret1" })
    }

    #[tokio::test]
    async fn test_register_returns_201_with_token() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|registration| {
                registration.email == "ada@example.com" && registration.password == "Secret1"
            })
            .return_once(|registration| {
                Ok(AuthSession {
                    user: UserRecord {
                        uuid: registration.uuid,
                        name: registration.name,
                        email: registration.email,
                        role: Role::User,
                        created_at: Timestamp::UNIX_EPOCH,
                        updated_at: Timestamp::UNIX_EPOCH,
                    },
                    token: "signed.jwt.token".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/register")
            .json(&body())
            .send(&make_service(auth))
            .await;

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.token, "signed.jwt.token");
        assert_eq!(body.data.email, "ada@example.com");
        assert_eq!(body.data.role, "User");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::AlreadyExists));

        let mut res = TestClient::post("http://example.com/register")
            .json(&body())
            .send(&make_service(auth))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "User already exists");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_weak_password_never_reaches_service() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register().never();

        let mut res = TestClient::post("http://example.com/register")
            .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "password" }))
            .send(&make_service(auth))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Validation failed");
        assert_eq!(body.error.as_deref(), Some("Password isn't strong enough"));

        Ok(())
    }
}
