//! The storefront-side cart, mirrored into [`LocalStorage`] after every change.

use std::path::PathBuf;

use shopbot_core::{Cart, CartAction, CartLine, Product, ProductId};

use crate::error::StorefrontError;
use crate::storage::LocalStorage;

/// Storage key holding the serialized cart lines.
pub const CART_KEY: &str = "cart";

#[derive(Debug)]
pub struct CartStore {
    storage: LocalStorage,
    cart: Cart,
}

impl CartStore {
    /// Opens the storage file at `path` and restores the cart from it.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`LocalStorage::open`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorefrontError> {
        Ok(Self::load(LocalStorage::open(path)?))
    }

    /// Restores the cart from `storage`.
    ///
    /// An absent key starts an empty cart. So does a value that is not a
    /// list of cart lines; the bad value stays on disk until the next change
    /// overwrites it. The total is always recomputed from the lines.
    #[must_use]
    pub fn load(storage: LocalStorage) -> Self {
        let cart = match storage.get(CART_KEY) {
            None => Cart::new(),
            Some(raw) => match serde_json::from_str::<Vec<CartLine>>(raw) {
                Ok(lines) => Cart::from_lines(lines),
                Err(e) => {
                    tracing::warn!(
                        path = %storage.path().display(),
                        error = %e,
                        "stored cart is unreadable, starting empty"
                    );
                    Cart::new()
                }
            },
        };
        Self { storage, cart }
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Applies `action` and mirrors the result to storage.
    ///
    /// The in-memory cart only changes once the write has succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the cart cannot be written.
    pub fn dispatch(&mut self, action: &CartAction) -> Result<&Cart, StorefrontError> {
        let next = self.cart.reduce(action);
        let raw = serde_json::to_string(next.items()).map_err(|e| {
            StorefrontError::StorageFormat {
                path: self.storage.path().display().to_string(),
                source: e,
            }
        })?;
        self.storage.set(CART_KEY, raw)?;
        self.cart = next;
        Ok(&self.cart)
    }

    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn add(&mut self, product: Product) -> Result<&Cart, StorefrontError> {
        self.dispatch(&CartAction::Add(product))
    }

    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn remove(&mut self, product_id: ProductId) -> Result<&Cart, StorefrontError> {
        self.dispatch(&CartAction::Remove(product_id))
    }

    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<&Cart, StorefrontError> {
        self.dispatch(&CartAction::SetQuantity {
            product_id,
            quantity,
        })
    }

    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn remove_line(&mut self, product_id: ProductId) -> Result<&Cart, StorefrontError> {
        self.dispatch(&CartAction::RemoveLine(product_id))
    }

    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn clear(&mut self) -> Result<&Cart, StorefrontError> {
        self.dispatch(&CartAction::Clear)
    }
}
