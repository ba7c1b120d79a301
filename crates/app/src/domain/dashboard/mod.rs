//! Admin Dashboard

pub mod errors;
pub mod records;
pub mod service;

pub use errors::DashboardServiceError;
pub use service::*;
