//! Category Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    categories::{errors::into_status_error, get::CategoryResponse},
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Category Index Handler
///
/// Lists every category ordered by name.
#[endpoint(
    tags("admin"),
    summary = "List Categories",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<Vec<CategoryResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .categories
        .list_categories()
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Categories fetched successfully",
        categories.into_iter().map(Into::into).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::categories::{MockCategoriesService, records::CategoryUuid};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, admin_service, make_category};

    use super::*;

    #[tokio::test]
    async fn test_index_returns_categories_in_service_order() -> TestResult {
        let first = CategoryUuid::new();
        let second = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_categories()
            .once()
            .return_once(move || Ok(vec![make_category(first), make_category(second)]));

        let body: Envelope<Vec<CategoryResponse>> = TestClient::get("http://example.com/categories")
            .send(&admin_service(
                Mocks {
                    categories,
                    ..Mocks::default()
                },
                Router::with_path("categories").get(handler),
            ))
            .await
            .take_json()
            .await?;

        let uuids: Vec<_> = body.data.iter().map(|category| category.uuid).collect();

        assert_eq!(body.message, "Categories fetched successfully");
        assert_eq!(uuids, [first.into_uuid(), second.into_uuid()]);

        Ok(())
    }
}
