//! Order Handlers

use salvo::prelude::StatusError;

use storefront_app::domain::orders::records::OrderUuid;

use crate::extensions::*;

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod mine;
pub(crate) mod update;

pub(super) fn parse_order(id: &str) -> Result<OrderUuid, StatusError> {
    id.parse().or_400("Invalid order ID")
}
