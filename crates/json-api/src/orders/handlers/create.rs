//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::{
    data::{NewOrder, OrderLineRequest},
    records::OrderUuid,
};

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{
        errors::into_status_error,
        get::{OrderResponse, ShippingAddressPayload},
    },
    state::State,
};

/// Requested line item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLinePayload {
    /// Product UUID
    pub product: String,

    /// Units wanted, at least one
    #[serde(alias = "quantity")]
    pub qty: i64,
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLinePayload>,

    #[serde(default)]
    pub shipping_address: Option<ShippingAddressPayload>,

    /// Defaults to `card`
    pub payment_method: Option<String>,

    pub notes: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            items: request
                .items
                .into_iter()
                .map(|line| OrderLineRequest {
                    product: line.product,
                    quantity: line.qty,
                })
                .collect(),
            shipping: request.shipping_address.unwrap_or_default().into(),
            payment_method: request.payment_method,
            notes: request.notes,
        }
    }
}

/// Create Order Handler
///
/// Places an order for the signed-in user. Stock for every line is reserved
/// together; if any line fails nothing is reserved.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty order, invalid line or insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.identity_or_401()?.uuid;

    let order = state
        .app
        .orders
        .create_order(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let uuid = order.order.uuid;

    tracing::info!(
        order_uuid = %uuid,
        user_uuid = %user,
        total = order.order.total,
        "created order"
    );

    res.add_header(LOCATION, format!("/api/orders/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Envelope::ok("Order created successfully", order.into()))
}
