//! Admin Dashboard Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use storefront_app::domain::dashboard::{DashboardServiceError, records::DashboardStats};

use crate::{
    envelope::Envelope, extensions::*, products::get::ProductResponse,
    state::State, users::index::UserResponse,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsResponse {
    pub total_users: u64,
    pub total_products: u64,
    pub total_categories: u64,
    pub total_orders: u64,

    /// Sum of every order total in pence/cents
    pub total_revenue: u64,
}

impl From<DashboardStats> for StatsResponse {
    fn from(stats: DashboardStats) -> Self {
        StatsResponse {
            total_users: stats.total_users,
            total_products: stats.total_products,
            total_categories: stats.total_categories,
            total_orders: stats.total_orders,
            total_revenue: stats.total_revenue,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardResponse {
    pub stats: StatsResponse,

    /// The five newest products
    pub recent_products: Vec<ProductResponse>,

    /// The five newest users
    pub recent_users: Vec<UserResponse>,
}

fn into_status_error(error: DashboardServiceError) -> StatusError {
    match error {
        DashboardServiceError::Sql(source) => {
            error!("failed to load dashboard: {source}");

            StatusError::internal_server_error().detail(source.to_string())
        }
    }
}

/// Dashboard Handler
///
/// Store-wide totals plus the newest products and users.
#[endpoint(
    tags("admin"),
    summary = "Dashboard Stats",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Envelope<DashboardResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let dashboard = state
        .app
        .dashboard
        .dashboard()
        .await
        .map_err(into_status_error)?;

    Ok(Envelope::ok(
        "Dashboard stats fetched successfully",
        DashboardResponse {
            stats: dashboard.stats.into(),
            recent_products: dashboard.recent_products.into_iter().map(Into::into).collect(),
            recent_users: dashboard.recent_users.into_iter().map(Into::into).collect(),
        },
    ))
}
