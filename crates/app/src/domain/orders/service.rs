//! Orders service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        orders::{
            data::{DEFAULT_PAYMENT_METHOD, NewOrder, OrderLineRequest},
            errors::OrdersServiceError,
            records::{
                OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid,
                ProductSummary, ResolvedOrder, ResolvedOrderItem,
            },
            repository::{NewOrderItemRow, NewOrderRow, PgOrdersRepository},
        },
        pagination::{Page, Pagination},
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
};

/// A submitted line with its product reference parsed, but not yet checked.
#[derive(Debug)]
struct SubmittedLine {
    raw_product: String,
    product: Option<ProductUuid>,
    quantity: i64,
}

impl SubmittedLine {
    fn product(&self) -> Result<ProductUuid, OrdersServiceError> {
        self.product.ok_or(OrdersServiceError::InvalidProductId)
    }

    fn quantity(&self) -> Result<u64, OrdersServiceError> {
        u64::try_from(self.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(OrdersServiceError::InvalidQuantity)
    }
}

/// Parse every submitted line without rejecting any of them.
///
/// Per-line failures are reported later, in submission order, alongside the
/// existence and stock checks.
fn submitted_lines(lines: &[OrderLineRequest]) -> Result<Vec<SubmittedLine>, OrdersServiceError> {
    if lines.is_empty() {
        return Err(OrdersServiceError::EmptyOrder);
    }

    Ok(lines
        .iter()
        .map(|line| SubmittedLine {
            raw_product: line.product.clone(),
            product: line.product.parse::<ProductUuid>().ok(),
            quantity: line.quantity,
        })
        .collect())
}

/// Distinct well-formed product ids of `lines`, sorted.
fn lock_order(lines: &[SubmittedLine]) -> Vec<ProductUuid> {
    let mut products: Vec<ProductUuid> = lines.iter().filter_map(|line| line.product).collect();

    products.sort_unstable();
    products.dedup();

    products
}

impl From<&ProductRecord> for ProductSummary {
    fn from(product: &ProductRecord) -> Self {
        Self {
            uuid: product.uuid,
            name: product.name.clone(),
            price: product.price,
            images: product.images.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    products: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    /// Attach line items, with product display fields, to each order.
    async fn resolve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: Vec<OrderRecord>,
    ) -> Result<Vec<ResolvedOrder>, sqlx::Error> {
        let order_uuids: Vec<OrderUuid> = orders.iter().map(|o| o.uuid).collect();
        let items = self.repository.list_order_items(tx, &order_uuids).await?;

        let mut product_uuids: Vec<ProductUuid> = items.iter().map(|i| i.product_uuid).collect();

        product_uuids.sort_unstable();
        product_uuids.dedup();

        let products: HashMap<ProductUuid, ProductSummary> = self
            .products
            .get_products(tx, &product_uuids)
            .await?
            .iter()
            .map(|product| (product.uuid, ProductSummary::from(product)))
            .collect();

        let mut items_by_order: HashMap<OrderUuid, Vec<ResolvedOrderItem>> = HashMap::new();

        for item in items {
            let product = products.get(&item.product_uuid).cloned();

            items_by_order
                .entry(item.order_uuid)
                .or_default()
                .push(ResolvedOrderItem { item, product });
        }

        Ok(orders
            .into_iter()
            .map(|order| ResolvedOrder {
                items: items_by_order.remove(&order.uuid).unwrap_or_default(),
                order,
            })
            .collect())
    }

    async fn resolve_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<ResolvedOrder, OrdersServiceError> {
        self.resolve(tx, vec![order])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<ResolvedOrder, OrdersServiceError> {
        let lines = submitted_lines(&order.items)?;

        // Dropping `tx` on any early return rolls back every decrement made so far.
        let mut tx = self.db.begin().await?;

        self.products.lock_products(&mut tx, &lock_order(&lines)).await?;

        let mut total: u64 = 0;
        let mut reserved: Vec<(ProductUuid, u64, ProductRecord)> = Vec::with_capacity(lines.len());

        for line in lines {
            let product = line.product()?;

            let current = match self.products.get_product(&mut tx, product).await {
                Ok(current) => current,
                Err(sqlx::Error::RowNotFound) => {
                    return Err(OrdersServiceError::ProductNotFound(line.raw_product));
                }
                Err(error) => return Err(error.into()),
            };

            let quantity = line.quantity()?;

            let Some(decremented) = self
                .products
                .decrement_stock(&mut tx, product, quantity)
                .await?
            else {
                debug!(
                    %product,
                    requested = quantity,
                    available = current.stock,
                    "insufficient stock"
                );

                return Err(OrdersServiceError::InsufficientStock(current.name));
            };

            let subtotal = decremented
                .price
                .checked_mul(quantity)
                .ok_or(OrdersServiceError::TotalOverflow)?;

            total = total
                .checked_add(subtotal)
                .ok_or(OrdersServiceError::TotalOverflow)?;

            reserved.push((product, quantity, decremented));
        }

        let created = self
            .repository
            .create_order(
                &mut tx,
                NewOrderRow {
                    uuid: order.uuid,
                    user_uuid: user,
                    total,
                    shipping: order.shipping,
                    payment_method: order
                        .payment_method
                        .filter(|method| !method.is_empty())
                        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
                    notes: order.notes.unwrap_or_default(),
                },
            )
            .await?;

        let mut items = Vec::with_capacity(reserved.len());

        for (position, (product_uuid, quantity, product)) in (0_u32..).zip(reserved) {
            let item: OrderItemRecord = self
                .repository
                .create_order_item(
                    &mut tx,
                    NewOrderItemRow {
                        uuid: OrderItemUuid::new(),
                        order_uuid: created.uuid,
                        position,
                        product_uuid,
                        quantity,
                        unit_price: product.price,
                    },
                )
                .await?;

            items.push(ResolvedOrderItem {
                item,
                product: Some(ProductSummary::from(&product)),
            });
        }

        tx.commit().await?;

        info!(order = %created.uuid, %user, total, "order placed");

        Ok(ResolvedOrder {
            order: created,
            items,
        })
    }

    async fn list_user_orders(
        &self,
        user: UserUuid,
        pagination: Pagination,
    ) -> Result<Page<ResolvedOrder>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .repository
            .list_user_orders(&mut tx, user, pagination)
            .await?;

        let total = self.repository.count_user_orders(&mut tx, user).await?;
        let orders = self.resolve(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(Page::new(orders, total, pagination))
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<ResolvedOrder, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        if order.user_uuid != user {
            return Err(OrdersServiceError::Forbidden);
        }

        let resolved = self.resolve_one(&mut tx, order).await?;

        tx.commit().await?;

        Ok(resolved)
    }

    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<ResolvedOrder, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_status(&mut tx, order, status).await?;
        let resolved = self.resolve_one(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(resolved)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order on behalf of `user`, reserving stock for every line.
    ///
    /// Either every line is reserved and the order is stored, or nothing changes.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<ResolvedOrder, OrdersServiceError>;

    /// Orders placed by `user`, newest first.
    async fn list_user_orders(
        &self,
        user: UserUuid,
        pagination: Pagination,
    ) -> Result<Page<ResolvedOrder>, OrdersServiceError>;

    /// Retrieve an order owned by `user`.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<ResolvedOrder, OrdersServiceError>;

    /// Overwrite an order's status. Line items and total never change.
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<ResolvedOrder, OrdersServiceError>;
}
