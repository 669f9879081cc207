pub mod cart_store;
pub mod checkout;
pub mod client;
pub mod error;
pub mod storage;
mod types;

pub use cart_store::{CartStore, CART_KEY};
pub use checkout::{CardDetails, Storefront};
pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use storage::LocalStorage;
