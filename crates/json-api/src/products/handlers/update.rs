//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::data::ProductUpdate;

use crate::{
    envelope::Envelope,
    extensions::*,
    products::{
        errors::into_status_error,
        get::ProductResponse,
        handlers::{parse_category, parse_product, parse_status},
    },
    state::State,
};

/// Update Product Request
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: Option<String>,

    pub description: Option<String>,

    /// Price in pence/cents
    pub price: Option<u64>,

    /// Category UUID
    pub category: Option<String>,

    pub images: Option<Vec<String>>,

    pub stock: Option<u64>,

    /// `active` or `inactive`
    pub status: Option<String>,
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateProductRequest) -> Result<Self, Self::Error> {
        let filled = |field: Option<String>| field.filter(|value| !value.trim().is_empty());

        Ok(ProductUpdate {
            name: filled(request.name),
            description: filled(request.description),
            price: request.price,
            category_uuid: filled(request.category)
                .map(|category| parse_category(category.trim()))
                .transpose()?,
            images: request.images,
            stock: request.stock,
            status: filled(request.status)
                .map(|status| parse_status(status.trim()))
                .transpose()?,
        })
    }
}

/// Update Product Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = parse_product(&id.into_inner())?;
    let update = ProductUpdate::try_from(json.into_inner())?;

    let product = state
        .app
        .products
        .update_product(product, update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product.product.uuid, "updated product");

    Ok(Envelope::ok("Product updated successfully", product.into()))
}
