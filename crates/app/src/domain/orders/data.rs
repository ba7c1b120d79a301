//! Order Data

use crate::domain::orders::records::{OrderUuid, ShippingAddress};

/// Payment method recorded when the caller does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "card";

/// One requested line, exactly as submitted.
///
/// The product reference is kept raw so that malformed identifiers are
/// reported by the order workflow itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub product: String,
    pub quantity: i64,
}

/// New Order Data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<OrderLineRequest>,
    pub shipping: ShippingAddress,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}
