//! My Orders Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    pagination,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersPage {
    /// Orders on this page, newest first
    pub orders: Vec<OrderResponse>,

    /// Number of orders the user has placed
    pub total: u64,

    /// Current page number
    pub page: u32,

    /// Number of pages
    pub pages: u64,
}

/// My Orders Handler
///
/// Lists the signed-in user's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrdersPage>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.identity_or_401()?.uuid;
    let pagination = pagination::from_query(page, limit)?;

    let orders = state
        .app
        .orders
        .list_user_orders(user, pagination)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Orders fetched successfully",
        OrdersPage {
            orders: orders.items.into_iter().map(Into::into).collect(),
            total: orders.total,
            page: orders.page,
            pages: orders.pages,
        },
    ))
}
