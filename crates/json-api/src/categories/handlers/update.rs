//! Update Category Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use storefront_app::domain::categories::{
    CategoriesServiceError, data::CategoryUpdate, records::CategoryUuid,
};

use crate::{
    categories::{
        create::CategoryRequest, errors::into_status_error, get::CategoryResponse,
        handlers::clean_name,
    },
    envelope::Envelope,
    extensions::*,
    state::State,
};

/// Update Category Handler
///
/// Renames a category. The new name must not belong to another category.
#[endpoint(
    tags("admin"),
    summary = "Update Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Category updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid name"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
        (status_code = StatusCode::CONFLICT, description = "Name taken by another category"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<CategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<CategoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let category = id
        .into_inner()
        .parse::<CategoryUuid>()
        .or_400("Invalid category ID")?;
    let name = clean_name(json.into_inner().name)?;

    let category = state
        .app
        .categories
        .update_category(category, CategoryUpdate { name })
        .await
        .map_err(|error| match error {
            CategoriesServiceError::AlreadyExists => {
                StatusError::conflict().brief("Another category with this name already exists")
            }
            error => into_status_error(error),
        })?;

    tracing::info!(category_uuid = %category.uuid, "renamed category");

    Ok(Envelope::ok("Category updated successfully", category.into()))
}
