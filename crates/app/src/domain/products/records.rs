//! Product Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        categories::records::{CategoryRecord, CategoryUuid},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Whether a product is offered in the public catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Status must be one of: active, inactive")]
pub struct UnknownProductStatus;

impl FromStr for ProductStatus {
    type Err = UnknownProductStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UnknownProductStatus),
        }
    }
}

/// Product Record
///
/// `price` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category_uuid: CategoryUuid,
    pub images: Vec<String>,
    pub stock: u64,
    pub status: ProductStatus,
    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product with its category reference hydrated.
///
/// `category` is `None` only if the category vanished between the two reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub product: ProductRecord,
    pub category: Option<CategoryRecord>,
}
