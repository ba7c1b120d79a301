//! Delete Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront_app::domain::categories::records::CategoryUuid;

use crate::{
    categories::errors::into_status_error, envelope::MessageResponse, extensions::*, state::State,
};

/// Delete Category Handler
///
/// Refused while any product still belongs to the category.
#[endpoint(
    tags("admin"),
    summary = "Delete Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Category deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Category in use"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let category = id
        .into_inner()
        .parse::<CategoryUuid>()
        .or_400("Invalid category ID")?;

    state
        .app
        .categories
        .delete_category(category)
        .await
        .map_err(into_status_error)?;

    tracing::info!(category_uuid = %category, "deleted category");

    Ok(MessageResponse::ok("Category deleted successfully"))
}
