//! Dashboard Records

use crate::domain::{products::records::ResolvedProduct, users::records::UserRecord};

/// Store-wide totals. `total_revenue` is in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_products: u64,
    pub total_categories: u64,
    pub total_orders: u64,
    pub total_revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_products: Vec<ResolvedProduct>,
    pub recent_users: Vec<UserRecord>,
}
