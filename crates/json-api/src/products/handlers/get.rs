//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::records::ResolvedProduct;

use crate::{
    categories::get::CategoryResponse,
    envelope::Envelope,
    extensions::*,
    products::{errors::into_status_error, handlers::parse_product},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    pub description: String,

    /// The price of the product in pence/cents
    pub price: u64,

    /// The category the product belongs to
    pub category_uuid: Uuid,

    /// The resolved category, absent if it has been removed
    pub category: Option<CategoryResponse>,

    /// Image URLs
    pub images: Vec<String>,

    /// Units available to order
    pub stock: u64,

    /// `active` or `inactive`
    pub status: String,

    /// The admin who created the product
    pub created_by: Option<Uuid>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ResolvedProduct> for ProductResponse {
    fn from(resolved: ResolvedProduct) -> Self {
        let product = resolved.product;

        ProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            description: product.description,
            price: product.price,
            category_uuid: product.category_uuid.into(),
            category: resolved.category.map(Into::into),
            images: product.images,
            stock: product.stock,
            status: product.status.to_string(),
            created_by: product.created_by.map(Into::into),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product with its category.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid product ID"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = parse_product(&id.into_inner())?;

    let product = state
        .app
        .products
        .get_product(product)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Product fetched successfully", product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::{
        envelope::ErrorEnvelope,
        test_helpers::{Mocks, make_product, service},
    };

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        service(
            Mocks {
                products,
                ..Mocks::default()
            },
            Router::with_path("products/{id}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_returns_product_with_category() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |product| *product == uuid)
            .return_once(move |_| Ok(make_product(uuid)));

        let body: Envelope<ProductResponse> =
            TestClient::get(format!("http://example.com/products/{uuid}"))
                .send(&make_service(products))
                .await
                .take_json()
                .await?;

        assert_eq!(body.message, "Product fetched successfully");
        assert_eq!(body.data.uuid, uuid.into_uuid());
        assert_eq!(body.data.price, 1_299);
        assert_eq!(body.data.status, "active");
        assert_eq!(
            body.data.category.map(|category| category.name).as_deref(),
            Some("Books")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invalid_id_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_get_product().never();

        let mut res = TestClient::get("http://example.com/products/42")
            .send(&make_service(products))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Invalid product ID");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/products/{}", ProductUuid::new()))
            .send(&make_service(products))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Product not found");

        Ok(())
    }
}
