//! Product Handlers

use salvo::prelude::StatusError;

use storefront_app::domain::{
    categories::records::CategoryUuid,
    products::records::{ProductStatus, ProductUuid},
};

use crate::extensions::*;

pub(crate) mod admin_index;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

pub(super) fn parse_product(id: &str) -> Result<ProductUuid, StatusError> {
    id.parse().or_400("Invalid product ID")
}

pub(super) fn parse_category(id: &str) -> Result<CategoryUuid, StatusError> {
    id.parse().or_400("Invalid category ID")
}

pub(super) fn parse_status(status: &str) -> Result<ProductStatus, StatusError> {
    status
        .parse::<ProductStatus>()
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))
}

/// An optional category filter; blank values are ignored.
pub(super) fn category_filter(raw: Option<String>) -> Result<Option<CategoryUuid>, StatusError> {
    raw.as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_category)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_category_filters_are_ignored() {
        assert_eq!(category_filter(None).ok(), Some(None));
        assert_eq!(category_filter(Some("  ".to_string())).ok(), Some(None));
    }

    #[test]
    fn malformed_category_filters_are_rejected() {
        assert_eq!(
            category_filter(Some("shoes".to_string()))
                .err()
                .map(|error| error.brief),
            Some("Invalid category ID".to_string())
        );
    }

    #[test]
    fn unknown_status_lists_valid_values() {
        assert_eq!(
            parse_status("archived").err().map(|error| error.brief),
            Some("Status must be one of: active, inactive".to_string())
        );
    }
}
