//! Categories service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::categories::{
        data::{CategoryUpdate, NewCategory},
        errors::CategoriesServiceError,
        records::{CategoryRecord, CategoryUuid},
        repository::PgCategoriesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
        }
    }
}

#[async_trait]
impl CategoriesService for PgCategoriesService {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn get_category(
        &self,
        category: CategoryUuid,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self.repository.get_category(&mut tx, category).await?;

        tx.commit().await?;

        Ok(category)
    }

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_category(&mut tx, category).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_category(&mut tx, category, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let in_use = self.repository.count_products(&mut tx, category).await?;

        if in_use > 0 {
            info!(%category, products = in_use, "category deletion refused");

            return Err(CategoriesServiceError::InUse(in_use));
        }

        let rows_affected = self.repository.delete_category(&mut tx, category).await?;

        if rows_affected == 0 {
            return Err(CategoriesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError>;

    async fn get_category(
        &self,
        category: CategoryUuid,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    async fn update_category(
        &self,
        category: CategoryUuid,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    /// Delete a category that no product references.
    async fn delete_category(&self, category: CategoryUuid) -> Result<(), CategoriesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{create_category, create_product},
    };

    use super::*;

    #[tokio::test]
    async fn list_categories_orders_by_name() -> TestResult {
        let ctx = TestContext::new().await;

        create_category(&ctx, "Toys").await?;
        create_category(&ctx, "Books").await?;
        create_category(&ctx, "Garden").await?;

        let names: Vec<String> = ctx
            .categories
            .list_categories()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, ["Books", "Garden", "Toys"]);

        Ok(())
    }

    #[tokio::test]
    async fn create_category_duplicate_name_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        create_category(&ctx, "Books").await?;

        let result = create_category(&ctx, "Books").await;

        assert!(
            matches!(result, Err(CategoriesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_category_renames() -> TestResult {
        let ctx = TestContext::new().await;

        let category = create_category(&ctx, "Boks").await?;

        let updated = ctx
            .categories
            .update_category(
                category.uuid,
                CategoryUpdate {
                    name: "Books".to_string(),
                },
            )
            .await?;

        assert_eq!(updated.uuid, category.uuid);
        assert_eq!(updated.name, "Books");
        assert!(updated.updated_at >= category.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn update_category_to_taken_name_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        create_category(&ctx, "Books").await?;
        let music = create_category(&ctx, "Music").await?;

        let result = ctx
            .categories
            .update_category(
                music.uuid,
                CategoryUpdate {
                    name: "Books".to_string(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(CategoriesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_category_referenced_by_products_is_refused() -> TestResult {
        let ctx = TestContext::new().await;

        let category = create_category(&ctx, "Books").await?;

        create_product(&ctx, category.uuid, "Dune", 1_999, 5).await?;
        create_product(&ctx, category.uuid, "Emma", 999, 5).await?;

        let result = ctx.categories.delete_category(category.uuid).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::InUse(2))),
            "expected InUse(2), got {result:?}"
        );

        ctx.categories.get_category(category.uuid).await?;

        Ok(())
    }

    #[tokio::test]
    async fn delete_unused_category_removes_it() -> TestResult {
        let ctx = TestContext::new().await;

        let category = create_category(&ctx, "Empty").await?;

        ctx.categories.delete_category(category.uuid).await?;

        let result = ctx.categories.get_category(category.uuid).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_category_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.categories.delete_category(CategoryUuid::new()).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
