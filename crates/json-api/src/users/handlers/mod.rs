//! User Handlers

pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod role;
