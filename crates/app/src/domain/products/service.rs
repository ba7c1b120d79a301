//! Products service.

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        categories::{records::CategoryUuid, repository::PgCategoriesRepository},
        pagination::{Page, Pagination},
        products::{
            data::{NewProduct, ProductQuery, ProductSort, ProductUpdate, SortDirection},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductStatus, ProductUuid, ResolvedProduct},
            repository::{PgProductsRepository, ProductFilter},
        },
    },
};

/// Hydrate each product's category with a single batched lookup.
pub(crate) async fn resolve_categories(
    categories: &PgCategoriesRepository,
    tx: &mut Transaction<'_, Postgres>,
    products: Vec<ProductRecord>,
) -> Result<Vec<ResolvedProduct>, sqlx::Error> {
    let mut uuids: Vec<CategoryUuid> = products.iter().map(|p| p.category_uuid).collect();

    uuids.sort_unstable();
    uuids.dedup();

    let by_uuid: HashMap<CategoryUuid, _> = categories
        .get_categories(tx, &uuids)
        .await?
        .into_iter()
        .map(|category| (category.uuid, category))
        .collect();

    Ok(products
        .into_iter()
        .map(|product| ResolvedProduct {
            category: by_uuid.get(&product.category_uuid).cloned(),
            product,
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    categories: PgCategoriesRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            categories: PgCategoriesRepository::new(),
        }
    }

    async fn page(
        &self,
        filter: ProductFilter,
        sort: ProductSort,
        direction: SortDirection,
        pagination: Pagination,
    ) -> Result<Page<ResolvedProduct>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self
            .repository
            .list_products(&mut tx, &filter, sort, direction, pagination)
            .await?;

        let total = self.repository.count_products(&mut tx, &filter).await?;
        let products = resolve_categories(&self.categories, &mut tx, products).await?;

        tx.commit().await?;

        Ok(Page::new(products, total, pagination))
    }

    async fn resolve_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductRecord,
    ) -> Result<ResolvedProduct, ProductsServiceError> {
        resolve_categories(&self.categories, tx, vec![product])
            .await?
            .pop()
            .ok_or(ProductsServiceError::NotFound)
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<Page<ResolvedProduct>, ProductsServiceError> {
        let filter = ProductFilter {
            category: query.category,
            search: query.search.filter(|s| !s.is_empty()),
            status: Some(ProductStatus::Active),
        };

        self.page(filter, query.sort, query.direction, query.pagination)
            .await
    }

    async fn list_all_products(
        &self,
        category: Option<CategoryUuid>,
        pagination: Pagination,
    ) -> Result<Page<ResolvedProduct>, ProductsServiceError> {
        let filter = ProductFilter {
            category,
            ..ProductFilter::default()
        };

        self.page(
            filter,
            ProductSort::CreatedAt,
            SortDirection::Descending,
            pagination,
        )
        .await
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ResolvedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;
        let resolved = self.resolve_one(&mut tx, product).await?;

        tx.commit().await?;

        Ok(resolved)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ResolvedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;
        let resolved = self.resolve_one(&mut tx, created).await?;

        tx.commit().await?;

        Ok(resolved)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ResolvedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        let resolved = self.resolve_one(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(resolved)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Search the public catalog.
    async fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<Page<ResolvedProduct>, ProductsServiceError>;

    /// List products of every status, newest first.
    async fn list_all_products(
        &self,
        category: Option<CategoryUuid>,
        pagination: Pagination,
    ) -> Result<Page<ResolvedProduct>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ResolvedProduct, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ResolvedProduct, ProductsServiceError>;

    /// Updates the supplied fields of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ResolvedProduct, ProductsServiceError>;

    /// Deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
