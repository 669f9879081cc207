//! Shopping-cart state and the reducer that drives it.
//!
//! A [`Cart`] is only ever changed by applying a [`CartAction`]. Every line
//! holds a quantity of at least one and `total` always equals the sum of the
//! line totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductId};

/// One product entry in a cart together with its quantity.
///
/// Serialized as `{productId, product, quantity}`. On input `productId` is
/// optional and the embedded product's id wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StoredLine", from = "StoredLine")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLine {
    #[serde(default)]
    product_id: Option<ProductId>,
    product: Product,
    quantity: u32,
}

impl From<CartLine> for StoredLine {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: Some(line.product.id),
            product: line.product,
            quantity: line.quantity,
        }
    }
}

impl From<StoredLine> for CartLine {
    fn from(stored: StoredLine) -> Self {
        Self {
            product: stored.product,
            quantity: stored.quantity,
        }
    }
}

impl CartLine {
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price multiplied by quantity, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// A cart line as stored by the shop backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    pub id: u64,
    pub product_id: ProductId,
    pub product: Product,
    pub quantity: u32,
}

/// Body of a request adding a line to the backend cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Actions accepted by [`Cart::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of the product, appending a new line if needed.
    Add(Product),
    /// Remove one unit of the product; the line is dropped at quantity one.
    Remove(ProductId),
    /// Overwrite a line's quantity. Zero drops the line.
    SetQuantity {
        product_id: ProductId,
        quantity: u32,
    },
    /// Drop a line regardless of its quantity.
    RemoveLine(ProductId),
    /// Reset to the empty cart.
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLine>,
    total: Decimal,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines.
    ///
    /// Lines with a zero quantity are discarded and repeated products are
    /// merged into the first occurrence, so the result upholds the cart
    /// invariants whatever the stored data looked like. The total is
    /// recomputed from the surviving lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut items: Vec<CartLine> = Vec::with_capacity(lines.len());
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match items.iter_mut().find(|l| l.product_id() == line.product_id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => items.push(line),
            }
        }
        let total = sum_lines(&items);
        Self { items, total }
    }

    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.items.iter().find(|l| l.product_id() == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.line(product_id).is_some()
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.items
    }

    /// Computes the state that results from applying `action` to `self`.
    ///
    /// Actions that target a product not in the cart return an unchanged copy.
    #[must_use]
    pub fn reduce(&self, action: &CartAction) -> Cart {
        match action {
            CartAction::Add(product) => self.added(product),
            CartAction::Remove(product_id) => self.removed_one(*product_id),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.with_quantity(*product_id, *quantity),
            CartAction::RemoveLine(product_id) => self.without_line(*product_id),
            CartAction::Clear => Cart::new(),
        }
    }

    /// Applies `action` in place.
    pub fn apply(&mut self, action: &CartAction) {
        *self = self.reduce(action);
    }

    // An existing line keeps the product it was first added with.
    fn added(&self, product: &Product) -> Cart {
        let mut items = self.items.clone();
        match items.iter_mut().find(|l| l.product_id() == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => items.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
        let total = sum_lines(&items);
        Cart { items, total }
    }

    fn removed_one(&self, product_id: ProductId) -> Cart {
        let Some(target) = self.line(product_id) else {
            return self.clone();
        };

        let items: Vec<CartLine> = if target.quantity > 1 {
            self.items
                .iter()
                .map(|l| {
                    if l.product_id() == product_id {
                        CartLine {
                            product: l.product.clone(),
                            quantity: l.quantity - 1,
                        }
                    } else {
                        l.clone()
                    }
                })
                .collect()
        } else {
            self.items
                .iter()
                .filter(|l| l.product_id() != product_id)
                .cloned()
                .collect()
        };

        let total = sum_lines(&items);
        Cart { items, total }
    }

    fn with_quantity(&self, product_id: ProductId, quantity: u32) -> Cart {
        if quantity == 0 {
            return self.without_line(product_id);
        }
        if !self.contains(product_id) {
            return self.clone();
        }
        let items: Vec<CartLine> = self
            .items
            .iter()
            .map(|l| {
                if l.product_id() == product_id {
                    CartLine {
                        product: l.product.clone(),
                        quantity,
                    }
                } else {
                    l.clone()
                }
            })
            .collect();
        let total = sum_lines(&items);
        Cart { items, total }
    }

    fn without_line(&self, product_id: ProductId) -> Cart {
        if !self.contains(product_id) {
            return self.clone();
        }
        let items: Vec<CartLine> = self
            .items
            .iter()
            .filter(|l| l.product_id() != product_id)
            .cloned()
            .collect();
        let total = sum_lines(&items);
        Cart { items, total }
    }
}

fn sum_lines(items: &[CartLine]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.line_total()))
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
