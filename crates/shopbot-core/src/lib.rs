pub mod app_config;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod orders;
pub mod payments;
pub mod products;

pub use app_config::{AppConfig, DiscordCredentials, Environment};
pub use cart::{Cart, CartAction, CartItemRecord, CartLine, NewCartItem};
pub use catalog::{load_catalog, Catalog, Category};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{CustomerDetails, OrderCard, OrderItem, OrderReceipt, OrderRequest};
pub use payments::{FieldError, Payment, PaymentRequest, PaymentStatus};
pub use products::{CategoryId, Product, ProductCategory, ProductId, ProductInput};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
