//! Dashboard service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        categories::repository::PgCategoriesRepository,
        dashboard::{
            errors::DashboardServiceError,
            records::{Dashboard, DashboardStats},
        },
        orders::repository::PgOrdersRepository,
        products::{
            repository::{PgProductsRepository, ProductFilter},
            service::resolve_categories,
        },
        users::repository::PgUsersRepository,
    },
};

/// Number of recent products and users shown on the dashboard.
pub const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct PgDashboardService {
    db: Db,
    users: PgUsersRepository,
    categories: PgCategoriesRepository,
    products: PgProductsRepository,
    orders: PgOrdersRepository,
}

impl PgDashboardService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            categories: PgCategoriesRepository::new(),
            products: PgProductsRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl DashboardService for PgDashboardService {
    async fn dashboard(&self) -> Result<Dashboard, DashboardServiceError> {
        let mut tx = self.db.begin().await?;

        let stats = DashboardStats {
            total_users: self.users.count_users(&mut tx).await?,
            total_products: self
                .products
                .count_products(&mut tx, &ProductFilter::default())
                .await?,
            total_categories: self.categories.count_categories(&mut tx).await?,
            total_orders: self.orders.count_orders(&mut tx).await?,
            total_revenue: self.orders.total_revenue(&mut tx).await?,
        };

        let recent_products = self.products.recent_products(&mut tx, RECENT_LIMIT).await?;
        let recent_products = resolve_categories(&self.categories, &mut tx, recent_products).await?;
        let recent_users = self.users.recent_users(&mut tx, RECENT_LIMIT).await?;

        tx.commit().await?;

        Ok(Dashboard {
            stats,
            recent_products,
            recent_users,
        })
    }
}

#[automock]
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Store-wide totals plus the most recently created products and users.
    async fn dashboard(&self) -> Result<Dashboard, DashboardServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            orders::{
                OrdersService,
                data::{NewOrder, OrderLineRequest},
                records::OrderUuid,
            },
            users::{UsersService, records::Role},
        },
        test::{
            TestContext,
            helpers::{create_category, create_product, new_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn empty_store_has_zero_totals() -> TestResult {
        let ctx = TestContext::new().await;

        let dashboard = ctx.dashboard.dashboard().await?;

        assert_eq!(dashboard.stats, DashboardStats::default());
        assert!(dashboard.recent_products.is_empty());
        assert!(dashboard.recent_users.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn dashboard_counts_everything_and_sums_revenue() -> TestResult {
        let ctx = TestContext::new().await;

        let buyer = ctx
            .users
            .create_user(new_user("buyer@example.com", Role::User))
            .await?;
        let category = create_category(&ctx, "Books").await?;

        let mut products = Vec::new();

        for index in 0..6 {
            products.push(create_product(&ctx, category.uuid, &format!("Book {index}"), 250, 10).await?);
        }

        for quantity in [1, 3] {
            ctx.orders
                .create_order(
                    buyer.uuid,
                    NewOrder {
                        uuid: OrderUuid::new(),
                        items: vec![OrderLineRequest {
                            product: products[0].product.uuid.to_string(),
                            quantity,
                        }],
                        ..NewOrder::default()
                    },
                )
                .await?;
        }

        let dashboard = ctx.dashboard.dashboard().await?;

        assert_eq!(
            dashboard.stats,
            DashboardStats {
                total_users: 1,
                total_products: 6,
                total_categories: 1,
                total_orders: 2,
                total_revenue: 1_000,
            }
        );
        assert_eq!(dashboard.recent_products.len(), 5);
        assert_eq!(dashboard.recent_products[0].product.name, "Book 5");
        assert_eq!(dashboard.recent_products[0].category, Some(category));
        assert_eq!(dashboard.recent_users, [buyer]);

        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_buyer_keeps_their_orders_and_revenue() -> TestResult {
        let ctx = TestContext::new().await;

        let admin = ctx
            .users
            .create_user(new_user("admin@example.com", Role::Admin))
            .await?;
        let buyer = ctx
            .users
            .create_user(new_user("buyer@example.com", Role::User))
            .await?;
        let category = create_category(&ctx, "Books").await?;
        let product = create_product(&ctx, category.uuid, "Dune", 400, 5).await?;

        let placed = ctx
            .orders
            .create_order(
                buyer.uuid,
                NewOrder {
                    uuid: OrderUuid::new(),
                    items: vec![OrderLineRequest {
                        product: product.product.uuid.to_string(),
                        quantity: 2,
                    }],
                    ..NewOrder::default()
                },
            )
            .await?;

        ctx.users.delete_user(admin.uuid, buyer.uuid).await?;

        let dashboard = ctx.dashboard.dashboard().await?;

        assert_eq!(dashboard.stats.total_users, 1);
        assert_eq!(dashboard.stats.total_orders, 1);
        assert_eq!(dashboard.stats.total_revenue, 800);

        let kept = ctx.orders.get_order(buyer.uuid, placed.order.uuid).await?;

        assert_eq!(kept.order.total, 800);

        Ok(())
    }
}
