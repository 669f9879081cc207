use shopbot_core::{FieldError, ProductId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    /// The backend refused the request and explained why.
    #[error("request rejected ({status} {code}): {message}{}", render_details(.details))]
    Rejected {
        status: u16,
        code: String,
        message: String,
        details: Vec<FieldError>,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid storefront API URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("product {0} does not exist")]
    UnknownProduct(ProductId),

    #[error("the cart is empty")]
    EmptyCart,

    #[error("failed to access local storage at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("local storage at {path} is not a JSON object: {source}")]
    StorageFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn render_details(details: &[FieldError]) -> String {
    if details.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = details.iter().map(ToString::to_string).collect();
    format!(" [{}]", parts.join("; "))
}
