//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyOrder
        | OrdersServiceError::InvalidProductId
        | OrdersServiceError::InvalidQuantity
        | OrdersServiceError::InsufficientStock(_) => {
            StatusError::bad_request().brief(error.to_string())
        }
        OrdersServiceError::ProductNotFound(_) => StatusError::not_found().brief(error.to_string()),
        OrdersServiceError::TotalOverflow => {
            StatusError::bad_request().brief("Order total is too large")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => StatusError::forbidden().brief("Unauthorized"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to query orders: {source}");

            StatusError::internal_server_error().detail(source.to_string())
        }
    }
}
