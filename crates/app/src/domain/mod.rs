//! Storefront Domain Concerns

pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod pagination;
pub mod products;
pub mod users;
