//! Pagination query parameters.

use salvo::{oapi::extract::QueryParam, prelude::StatusError};
use storefront_app::domain::pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Pagination};

fn positive(raw: Option<String>, default: u32, message: &str) -> Result<u32, StatusError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| StatusError::bad_request().brief(message))
}

/// Parse `page` (default 1) and `limit` (default 10, at most 100).
pub(crate) fn from_query(
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
) -> Result<Pagination, StatusError> {
    let page = positive(page.into_inner(), 1, "Page must be a positive integer")?;
    let limit = positive(
        limit.into_inner(),
        DEFAULT_PAGE_LIMIT,
        "Limit must be a positive integer",
    )?;

    if limit > MAX_PAGE_LIMIT {
        return Err(StatusError::bad_request().brief("Limit cannot exceed 100"));
    }

    Ok(Pagination::new(page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(positive(None, 10, "bad").ok(), Some(10));
    }

    #[test]
    fn zero_and_garbage_are_rejected() {
        for raw in ["0", "-1", "ten", ""] {
            let result = positive(Some(raw.to_string()), 1, "Page must be a positive integer");

            assert_eq!(
                result.err().map(|error| error.brief),
                Some("Page must be a positive integer".to_string()),
                "{raw} should be rejected"
            );
        }
    }
}
