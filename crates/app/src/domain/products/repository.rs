//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    categories::records::CategoryUuid,
    pagination::Pagination,
    products::{
        data::{NewProduct, ProductSort, ProductUpdate, SortDirection},
        records::{ProductRecord, ProductStatus, ProductUuid},
    },
    users::records::UserUuid,
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const RECENT_PRODUCTS_SQL: &str = include_str!("sql/recent_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

/// Row filter shared by the listing and counting queries.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProductFilter {
    pub category: Option<CategoryUuid>,
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
        sort: ProductSort,
        direction: SortDirection,
        pagination: Pagination,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let order_by = format!(
            "{column} {keyword}, uuid {keyword}",
            column = sort.column(),
            keyword = direction.keyword(),
        );

        let sql = LIST_PRODUCTS_SQL.replace("{order_by}", &order_by);

        query_as::<Postgres, ProductRecord>(&sql)
            .bind(filter.category.map(CategoryUuid::into_uuid))
            .bind(filter.search.as_deref())
            .bind(filter.status.map(ProductStatus::as_str))
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .bind(filter.category.map(CategoryUuid::into_uuid))
            .bind(filter.search.as_deref())
            .bind(filter.status.map(ProductStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }

    pub(crate) async fn recent_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(RECENT_PRODUCTS_SQL)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch every product in `products`. Unknown ids are silently skipped.
    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|p| p.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(GET_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "products.repository.create_product", skip(self, tx), err)]
    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(product.description)
            .bind(encode_u64(product.price)?)
            .bind(product.category_uuid.into_uuid())
            .bind(product.images)
            .bind(encode_u64(product.stock)?)
            .bind(product.status.as_str())
            .bind(product.created_by.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "products.repository.update_product", skip(self, tx), err)]
    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.name)
            .bind(update.description)
            .bind(update.price.map(encode_u64).transpose()?)
            .bind(update.category_uuid.map(CategoryUuid::into_uuid))
            .bind(update.images)
            .bind(update.stock.map(encode_u64).transpose()?)
            .bind(update.status.map(ProductStatus::as_str))
            .fetch_one(&mut **tx)
            .await
    }

    /// Atomically take `quantity` units out of stock.
    ///
    /// Returns `None`, leaving the row untouched, when fewer than `quantity`
    /// units remain or the product does not exist.
    /// Row-lock every product in `products`, always in uuid order.
    ///
    /// Transactions that lock overlapping products this way queue behind
    /// each other instead of deadlocking. Unknown ids are skipped.
    #[tracing::instrument(name = "products.repository.lock_products", skip(self, tx), err)]
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<(), sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|p| p.into_uuid()).collect();

        query_scalar::<Postgres, Uuid>(LOCK_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "products.repository.decrement_stock", skip(self, tx), err)]
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(encode_u64(quantity)?)
            .fetch_optional(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "products.repository.delete_product", skip(self, tx), err)]
    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Convert an unsigned amount into the `BIGINT` storage representation.
pub(crate) fn encode_u64(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Read a `BIGINT` column that must never be negative.
pub(crate) fn decode_u64(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<ProductStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: decode_u64(row, "price")?,
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            images: row.try_get("images")?,
            stock: decode_u64(row, "stock")?,
            status,
            created_by: row
                .try_get::<Option<Uuid>, _>("created_by")?
                .map(UserUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_u64_rejects_values_beyond_bigint() {
        assert_eq!(encode_u64(1_999).ok(), Some(1_999));
        assert!(encode_u64(u64::MAX).is_err());
    }
}
