//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::{
    products::{
        data::NewProduct,
        records::{ProductStatus, ProductUuid},
    },
    users::records::UserUuid,
};

use crate::{
    envelope::Envelope,
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse, handlers::parse_category},
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub name: Option<String>,

    pub description: Option<String>,

    /// Price in pence/cents
    pub price: Option<u64>,

    /// Category UUID
    pub category: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    /// Units available, defaults to zero
    pub stock: Option<u64>,
}

impl CreateProductRequest {
    fn into_new_product(self, created_by: UserUuid) -> Result<NewProduct, StatusError> {
        let present = |field: Option<String>| field.filter(|value| !value.trim().is_empty());

        let (Some(name), Some(description), Some(price), Some(category)) = (
            present(self.name),
            present(self.description),
            self.price,
            present(self.category),
        ) else {
            return Err(StatusError::bad_request().brief("Missing required fields"));
        };

        Ok(NewProduct {
            uuid: ProductUuid::new(),
            name,
            description,
            price,
            category_uuid: parse_category(category.trim())?,
            images: self.images,
            stock: self.stock.unwrap_or_default(),
            status: ProductStatus::Active,
            created_by: Some(created_by),
        })
    }
}

/// Create Product Handler
///
/// New products are always `active`.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid fields"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.identity_or_401()?.uuid;
    let product = json.into_inner().into_new_product(admin)?;

    let product = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(into_status_error)?;

    let uuid = product.product.uuid;

    tracing::info!(product_uuid = %uuid, "created product");

    res.add_header(LOCATION, format!("/api/products/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Envelope::ok("Product created successfully", product.into()))
}
