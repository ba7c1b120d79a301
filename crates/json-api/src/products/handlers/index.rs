//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::data::{ProductQuery, ProductSort, SortDirection};

use crate::{
    envelope::Envelope,
    extensions::*,
    pagination,
    products::{errors::into_status_error, get::ProductResponse, handlers::category_filter},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsPage {
    /// Products on this page
    pub products: Vec<ProductResponse>,

    /// Number of products matching the filters
    pub total: u64,

    /// Current page number
    pub page: u32,

    /// Number of pages
    pub pages: u64,
}

fn parse_sort(req: &Request) -> Result<(ProductSort, SortDirection), StatusError> {
    let sort = req
        .query::<String>("sortBy")
        .map(|raw| raw.parse::<ProductSort>())
        .transpose()
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?
        .unwrap_or_default();

    let direction = req
        .query::<String>("sortOrder")
        .map(|raw| raw.parse::<SortDirection>())
        .transpose()
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?
        .unwrap_or_default();

    Ok((sort, direction))
}

/// Product Index Handler
///
/// Searches the public catalog. Only active products are listed.
///
/// `sortBy` is one of `createdAt`, `updatedAt`, `name`, `price` or `stock`
/// and `sortOrder` one of `asc`, `desc`, `1` or `-1`. Defaults to newest first.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid query parameter"),
    ),
)]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    q: QueryParam<String, false>,
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<Envelope<ProductsPage>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let (sort, direction) = parse_sort(req)?;

    let query = ProductQuery {
        category: category_filter(category.into_inner())?,
        search: q
            .into_inner()
            .map(|search| search.trim().to_string())
            .filter(|search| !search.is_empty()),
        sort,
        direction,
        pagination: pagination::from_query(page, limit)?,
    };

    let products = state
        .app
        .products
        .list_products(query)
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
