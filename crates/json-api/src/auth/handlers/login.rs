//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{errors::into_status_error, handlers::SessionResponse},
    extensions::*,
    state::State,
    validation::Violations,
};

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    /// Login email address
    pub email: String,

    /// Account password
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login Handler
///
/// Exchanges credentials for an identity token. Unknown emails and wrong
/// passwords produce the same response.
#[endpoint(
    tags("auth"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Login successful"),
        (status_code = StatusCode::BAD_REQUEST, description = "Validation failed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    Violations::new()
        .email(&request.email)
        .password(&request.password)
        .finish()?;

    let session = state
        .app
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(into_status_error)?;

    Ok(Json(SessionResponse::new("Login successful", session)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::{
        auth::{AuthServiceError, AuthSession, MockAuthService},
        domain::users::records::Role,
    };
    use testresult::TestResult;

    use crate::{
        auth::errors::INVALID_CREDENTIALS,
        envelope::ErrorEnvelope,
        test_helpers::{Mocks, TEST_USER_UUID, make_user, service},
    };

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        service(
            Mocks {
                auth,
                ..Mocks::default()
            },
            Router::with_path("login").post(handler),
        )
    }

    #[tokio::test]
    async fn test_login_returns_token() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login()
            .once()
            .withf(|email, password| email == "test@example.com" && password == "Secret1")
            .return_once(|_, _| {
                Ok(AuthSession {
                    user: make_user(TEST_USER_UUID, Role::User),
                    token: "signed.jwt.token".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/login")
            .json(&json!({ "email": "test@example.com", "password": "Secret1" }))
            .send(&make_service(auth))
            .await;

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, "Login successful");
        assert_eq!(body.token, "signed.jwt.token");

        Ok(())
    }

    #[tokio::test]
    async fn test_login_invalid_credentials_returns_generic_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login()
            .once()
            .return_once(|_, _| Err(AuthServiceError::InvalidCredentials));

        let mut res = TestClient::post("http://example.com/login")
            .json(&json!({ "email": "nobody@example.com", "password": "Secret1" }))
            .send(&make_service(auth))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.message, INVALID_CREDENTIALS);

        Ok(())
    }

    #[tokio::test]
    async fn test_login_malformed_email_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_login().never();

        let res = TestClient::post("http://example.com/login")
            .json(&json!({ "email": "nobody", "password": "Secret1" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
