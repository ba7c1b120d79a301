//! Current User Handler

use salvo::prelude::*;

use crate::{envelope::Envelope, extensions::*, users::index::UserResponse};

/// Current User Handler
///
/// Returns the account the bearer token belongs to.
#[endpoint(
    tags("auth"),
    summary = "Current User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Envelope<UserResponse>>, StatusError> {
    let user = depot.identity_or_401()?.clone();

    Ok(Envelope::ok("User is authenticated", user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, user_service};

    use super::*;

    #[tokio::test]
    async fn test_current_returns_identity() -> TestResult {
        let body: Envelope<UserResponse> = TestClient::get("http://example.com/auth")
            .send(&user_service(
                Mocks::default(),
                Router::with_path("auth").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(body.data.uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(body.data.email, "test@example.com");

        Ok(())
    }
}
