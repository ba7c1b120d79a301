//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::records::{OrderStatus, UnknownOrderStatus};

use crate::{
    envelope::Envelope,
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse, handlers::parse_order},
    state::State,
};

/// Update Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    /// One of `pending`, `confirmed`, `shipped`, `delivered` or `cancelled`
    pub status: Option<String>,
}

/// Update Order Status Handler
///
/// Only the status changes; line items and total are fixed once placed.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = parse_order(&id.into_inner())?;
    let status = json
        .into_inner()
        .status
        .ok_or(UnknownOrderStatus)
        .and_then(|status| status.parse::<OrderStatus>())
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let order = state
        .app
        .orders
        .update_order_status(order, status)
        .await
        .map_err(into_status_error)?;

    tracing::info!(order_uuid = %order.order.uuid, %status, "updated order status");

    Ok(Envelope::ok("Order updated successfully", order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::domain::{
        orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
        products::records::ProductUuid,
    };
    use testresult::TestResult;

    use crate::{
        envelope::ErrorEnvelope,
        test_helpers::{Mocks, TEST_USER_UUID, admin_service, make_order},
    };

    use super::*;

    const INVALID_STATUS: &str =
        "Status must be one of: pending, confirmed, shipped, delivered, cancelled";

    fn make_service(orders: MockOrdersService) -> Service {
        admin_service(
            Mocks {
                orders,
                ..Mocks::default()
            },
            Router::with_path("orders/{id}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_sets_status() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order_status()
            .once()
            .withf(move |order, status| *order == uuid && *status == OrderStatus::Shipped)
            .return_once(move |order, status| {
                let mut resolved = make_order(order, TEST_USER_UUID, ProductUuid::new());
                resolved.order.status = status;

                Ok(resolved)
            });

        let body: Envelope<OrderResponse> = TestClient::put(format!("http://example.com/orders/{uuid}"))
            .json(&json!({ "status": "shipped" }))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.message, "Order updated successfully");
        assert_eq!(body.data.status, "shipped");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_update_order_status().never();

        let mut res = TestClient::put(format!("http://example.com/orders/{}", OrderUuid::new()))
            .json(&json!({ "status": "refunded" }))
            .send(&make_service(orders))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, INVALID_STATUS);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_update_order_status().never();

        let mut res = TestClient::put(format!("http://example.com/orders/{}", OrderUuid::new()))
            .json(&json!({}))
            .send(&make_service(orders))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, INVALID_STATUS);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order_status()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::put(format!("http://example.com/orders/{}", OrderUuid::new()))
            .json(&json!({ "status": "delivered" }))
            .send(&make_service(orders))
            .await;

        let body: ErrorEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "Order not found");

        Ok(())
    }
}
