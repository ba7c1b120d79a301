//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{
    ProductSummary, ResolvedOrder, ResolvedOrderItem, ShippingAddress,
};

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{errors::into_status_error, handlers::parse_order},
    state::State,
};

/// Display fields of an ordered product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderedProductResponse {
    pub uuid: Uuid,
    pub name: String,

    /// Current catalog price in pence/cents
    pub price: u64,

    pub images: Vec<String>,
}

impl From<ProductSummary> for OrderedProductResponse {
    fn from(product: ProductSummary) -> Self {
        OrderedProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            price: product.price,
            images: product.images,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,

    /// Absent once the product has been removed from the catalog
    pub product: Option<OrderedProductResponse>,

    pub qty: u64,

    /// Unit price captured when the order was placed
    pub price: u64,
}

impl From<ResolvedOrderItem> for OrderItemResponse {
    fn from(resolved: ResolvedOrderItem) -> Self {
        OrderItemResponse {
            product_uuid: resolved.item.product_uuid.into(),
            product: resolved.product.map(Into::into),
            qty: resolved.item.quantity,
            price: resolved.item.unit_price,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressPayload {
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

impl From<ShippingAddress> for ShippingAddressPayload {
    fn from(shipping: ShippingAddress) -> Self {
        ShippingAddressPayload {
            address: shipping.address,
            city: shipping.city,
            zip_code: shipping.zip_code,
        }
    }
}

impl From<ShippingAddressPayload> for ShippingAddress {
    fn from(payload: ShippingAddressPayload) -> Self {
        ShippingAddress {
            address: payload.address,
            city: payload.city,
            zip_code: payload.zip_code,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The customer who placed the order
    pub user_uuid: Uuid,

    /// Line items in submission order
    pub items: Vec<OrderItemResponse>,

    /// Sum of every line in pence/cents
    pub total: u64,

    pub status: String,

    pub shipping_address: ShippingAddressPayload,

    pub payment_method: String,

    pub notes: String,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<ResolvedOrder> for OrderResponse {
    fn from(resolved: ResolvedOrder) -> Self {
        let order = resolved.order;

        OrderResponse {
            uuid: order.uuid.into(),
            user_uuid: order.user_uuid.into(),
            items: resolved.items.into_iter().map(Into::into).collect(),
            total: order.total,
            status: order.status.to_string(),
            shipping_address: order.shipping.into(),
            payment_method: order.payment_method,
            notes: order.notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Only the customer who placed an order may read it.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.identity_or_401()?.uuid;
    let order = parse_order(&id.into_inner())?;

    let order = state
        .app
        .orders
        .get_order(user, order)
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok("Order fetched successfully", order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::{
        orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
        products::records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::{
        envelope::ErrorEnvelope,
        test_helpers::{Mocks, TEST_USER_UUID, make_order, user_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        user_service(
            Mocks {
                orders,
                ..Mocks::default()
            },
            Router::with_path("orders/{id}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_returns_owned_order() -> TestResult {
        let uuid = OrderUuid::new();
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |user, order| *user == TEST_USER_UUID && *order == uuid)
            .return_once(move |user, order| Ok(make_order(order, user, product)));

        let body: Envelope<OrderResponse> = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.message, "Order fetched successfully");
        assert_eq!(body.data.total, 2_598);
        assert_eq!(body.data.status, "pending");
        assert_eq!(body.data.items.len(), 1);
        assert_eq!(
            body.data.items.first().map(|item| (item.product_uuid, item.qty)),
            Some((product.into_uuid(), 2))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_foreign_order_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let mut res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.message, "Unauthorized");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invalid_id_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let mut res = TestClient::get("http://example.com/orders/123")
            .send(&make_service(orders))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "Invalid order ID");

        Ok(())
    }
}
