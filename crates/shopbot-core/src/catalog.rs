//! Category → product lookup tables answered by the chat bot.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Electronics",
        &["Smartphone", "Laptop", "Tablet", "Headphones", "Monitor"],
    ),
    ("Books", &["Novel", "Biography", "Fantasy"]),
    ("Clothing", &["T-shirt", "Shoes", "Cap"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub products: Vec<String>,
}

/// Immutable category table. Names keep their display casing; lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The three-category table shipped with the bot.
    #[must_use]
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|(name, products)| Category {
                name: (*name).to_string(),
                products: products.iter().map(|p| (*p).to_string()).collect(),
            })
            .collect();
        Self { categories }
    }

    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        let wanted = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
    }

    /// Products listed under `name`, or an empty slice for unknown categories.
    #[must_use]
    pub fn products_in(&self, name: &str) -> &[String] {
        self.category(name)
            .map(|c| c.products.as_slice())
            .unwrap_or_default()
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: Catalog =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for category in &catalog.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }

        if !seen.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{}'",
                category.name
            )));
        }

        if category.products.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' lists an empty product name",
                category.name
            )));
        }
    }

    Ok(())
}
