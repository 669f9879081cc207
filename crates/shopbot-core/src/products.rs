use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payments::FieldError;

/// Numeric product identifier assigned by the shop backend.
pub type ProductId = u64;

pub type CategoryId = u64;

/// A product offered by the storefront backend. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price; serialized as a JSON number, e.g. `3999.99`.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// A product category managed by the shop backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Body of a create or update product request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl ProductInput {
    /// Checks the fields that do not depend on backend state.
    ///
    /// # Errors
    ///
    /// Returns the list of rejected fields when any check fails.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "name is required"));
        }
        if self.price <= Decimal::ZERO {
            errors.push(FieldError::new("price", "price must be greater than zero"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds the stored product for `id`.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_owned(),
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            category_id: self.category_id,
        }
    }
}
