//! Products Data

use std::str::FromStr;

use thiserror::Error;

use crate::domain::{
    categories::records::CategoryUuid,
    pagination::Pagination,
    products::records::{ProductStatus, ProductUuid},
    users::records::UserUuid,
};

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category_uuid: CategoryUuid,
    pub images: Vec<String>,
    pub stock: u64,
    pub status: ProductStatus,
    pub created_by: Option<UserUuid>,
}

/// Product Update Data
///
/// `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub category_uuid: Option<CategoryUuid>,
    pub images: Option<Vec<String>>,
    pub stock: Option<u64>,
    pub status: Option<ProductStatus>,
}

/// Sortable product columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Price,
    Stock,
}

impl ProductSort {
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("sortBy must be one of: createdAt, updatedAt, name, price, stock")]
pub struct UnknownProductSort;

impl FromStr for ProductSort {
    type Err = UnknownProductSort;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            _ => Err(UnknownProductSort),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,

    #[default]
    Descending,
}

impl SortDirection {
    pub(crate) const fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("sortOrder must be one of: asc, desc, 1, -1")]
pub struct UnknownSortDirection;

impl FromStr for SortDirection {
    type Err = UnknownSortDirection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" | "1" => Ok(Self::Ascending),
            "desc" | "-1" => Ok(Self::Descending),
            _ => Err(UnknownSortDirection),
        }
    }
}

/// Public catalog query. Only active products are ever returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<CategoryUuid>,

    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,

    pub sort: ProductSort,
    pub direction: SortDirection,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_accepts_words_and_signs() {
        assert_eq!("asc".parse(), Ok(SortDirection::Ascending));
        assert_eq!("1".parse(), Ok(SortDirection::Ascending));
        assert_eq!("desc".parse(), Ok(SortDirection::Descending));
        assert_eq!("-1".parse(), Ok(SortDirection::Descending));
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn product_sort_maps_to_columns() {
        assert_eq!("createdAt".parse::<ProductSort>().map(ProductSort::column), Ok("created_at"));
        assert_eq!("price".parse::<ProductSort>().map(ProductSort::column), Ok("price"));
        assert!("password_hash".parse::<ProductSort>().is_err());
    }
}
