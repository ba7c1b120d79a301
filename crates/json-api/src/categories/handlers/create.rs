//! Create Category Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::categories::{data::NewCategory, records::CategoryUuid};

use crate::{
    categories::{errors::into_status_error, get::CategoryResponse, handlers::clean_name},
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Category Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryRequest {
    /// Display name, 3 to 70 characters once trimmed
    pub name: Option<String>,
}

/// Create Category Handler
#[endpoint(
    tags("admin"),
    summary = "Create Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Category created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid name"),
        (status_code = StatusCode::CONFLICT, description = "Category already exists"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CategoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<CategoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let name = clean_name(json.into_inner().name)?;

    let category = state
        .app
        .categories
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            name,
        })
        .await
        .map_err(into_status_error)?;

    tracing::info!(category_uuid = %category.uuid, "created category");

    res.status_code(StatusCode::CREATED);

    Ok(Envelope::ok("Category created successfully", category.into()))
}
