//! Test Helpers

use crate::{
    domain::{
        categories::{
            CategoriesService, CategoriesServiceError,
            data::NewCategory,
            records::{CategoryRecord, CategoryUuid},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductStatus, ProductUuid, ResolvedProduct},
        },
        users::{
            data::NewUser,
            records::{Role, UserUuid},
        },
    },
    test::TestContext,
};

/// A user whose password is always `Secret123`.
pub(crate) fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "Secret123".to_string(),
        role,
    }
}

pub(crate) fn new_product(
    category: CategoryUuid,
    name: &str,
    price: u64,
    stock: u64,
) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        category_uuid: category,
        images: Vec::new(),
        stock,
        status: ProductStatus::Active,
        created_by: None,
    }
}

pub(crate) async fn create_category(
    ctx: &TestContext,
    name: &str,
) -> Result<CategoryRecord, CategoriesServiceError> {
    ctx.categories
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            name: name.to_string(),
        })
        .await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    category: CategoryUuid,
    name: &str,
    price: u64,
    stock: u64,
) -> Result<ResolvedProduct, ProductsServiceError> {
    ctx.products
        .create_product(new_product(category, name, price, stock))
        .await
}

pub(crate) async fn stock_of(
    ctx: &TestContext,
    product: ProductUuid,
) -> Result<u64, ProductsServiceError> {
    Ok(ctx.products.get_product(product).await?.product.stock)
}
