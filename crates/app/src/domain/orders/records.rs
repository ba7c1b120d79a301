//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Fulfilment state of an order. Any state may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Status must be one of: pending, confirmed, shipped, delivered, cancelled")]
pub struct UnknownOrderStatus;

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or(UnknownOrderStatus)
    }
}

/// Free-form delivery destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// Order Record
///
/// `total` is in minor currency units and is always derived from the line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub total: u64,
    pub status: OrderStatus,
    pub shipping: ShippingAddress,
    pub payment_method: String,
    pub notes: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
///
/// `unit_price` is the product price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub position: u32,
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    pub unit_price: u64,
}

/// Display fields of the product a line item refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub images: Vec<String>,
}

/// A line item with its product reference hydrated.
///
/// `product` is `None` once the product has been deleted from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrderItem {
    pub item: OrderItemRecord,
    pub product: Option<ProductSummary>,
}

/// An order with its line items, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub order: OrderRecord,
    pub items: Vec<ResolvedOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }

    #[test]
    fn unknown_order_status_lists_valid_values() {
        let error = "refunded".parse::<OrderStatus>().unwrap_err();

        assert_eq!(
            error.to_string(),
            "Status must be one of: pending, confirmed, shipped, delivered, cancelled"
        );
    }
}
