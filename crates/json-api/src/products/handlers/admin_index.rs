//! Admin Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::Envelope,
    extensions::*,
    pagination,
    products::{errors::into_status_error, handlers::category_filter, index::ProductsPage},
    state::State,
};

/// Admin Product Index Handler
///
/// Lists products of every status, newest first.
#[endpoint(
    tags("admin"),
    summary = "List All Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductsPage>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let category = category_filter(category.into_inner())?;
    let pagination = pagination::from_query(page, limit)?;

    let products = state
        .app
        .products
        .list_all_products(category, pagination)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Products fetched successfully",
        ProductsPage {
            products: products.items.into_iter().map(Into::into).collect(),
            total: products.total,
            page: products.page,
            pages: products.pages,
        },
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::{
        pagination::{Page, Pagination},
        products::{
            MockProductsService,
            records::{ProductStatus, ProductUuid},
        },
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, admin_service, make_product};

    use super::*;

    #[tokio::test]
    async fn test_admin_index_includes_inactive_products() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_list_all_products()
            .once()
            .withf(|category, pagination| category.is_none() && *pagination == Pagination::default())
            .return_once(move |_, pagination| {
                let mut product = make_product(uuid);
                product.product.status = ProductStatus::Inactive;

                Ok(Page::new(vec![product], 1, pagination))
            });

        let body: Envelope<ProductsPage> = TestClient::get("http://example.com/products")
            .send(&admin_service(
                Mocks {
                    products,
                    ..Mocks::default()
                },
                Router::with_path("products").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(body.data.products.len(), 1);
        assert_eq!(
            body.data.products.first().map(|product| product.status.as_str()),
            Some("inactive")
        );

        Ok(())
    }
}
