//! Category Handlers

use salvo::prelude::StatusError;

use crate::validation::Violations;

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

/// Trim a submitted category name and check it is usable.
pub(super) fn clean_name(name: Option<String>) -> Result<String, StatusError> {
    let name = name.as_deref().map(str::trim).unwrap_or_default();

    if name.is_empty() {
        return Err(StatusError::bad_request().brief("Category name is required"));
    }

    Violations::new().name(name).finish()?;

    Ok(name.to_string())
}
