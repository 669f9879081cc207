//! In-memory state behind the shop backend routes.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use shopbot_core::{
    CartItemRecord, CategoryId, NewCartItem, OrderReceipt, OrderRequest, Payment, PaymentRequest,
    Product, ProductCategory, ProductId, ProductInput,
};
use tokio::sync::RwLock;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

#[derive(Debug, Default)]
struct ShopData {
    categories: Vec<ProductCategory>,
    products: Vec<Product>,
    cart: Vec<CartItemRecord>,
    payments: Vec<Payment>,
    orders: Vec<OrderReceipt>,
    last_product_id: ProductId,
    last_cart_id: u64,
    last_payment_id: u64,
    last_order_id: u64,
}

/// Why a product could not be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductRejection {
    NotFound,
    UnknownCategory(CategoryId),
}

/// Shared handle to the shop's products, cart lines, payments and orders.
///
/// Each method takes the lock for one operation only.
#[derive(Debug, Clone, Default)]
pub struct ShopStore {
    inner: Arc<RwLock<ShopData>>,
}

impl ShopStore {
    #[must_use]
    pub fn new(categories: Vec<ProductCategory>, products: Vec<Product>) -> Self {
        let last_product_id = products.iter().map(|p| p.id).max().unwrap_or_default();
        Self {
            inner: Arc::new(RwLock::new(ShopData {
                categories,
                products,
                last_product_id,
                ..ShopData::default()
            })),
        }
    }

    /// A store stocked with the default categories and product range.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_categories(), seed_products())
    }

    pub async fn categories(&self) -> Vec<ProductCategory> {
        self.inner.read().await.categories.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.inner.read().await.products.clone()
    }

    /// Products priced at `min_price` or more.
    pub async fn products_from_price(&self, min_price: Decimal) -> Vec<Product> {
        self.inner
            .read()
            .await
            .products
            .iter()
            .filter(|p| p.price >= min_price)
            .cloned()
            .collect()
    }

    /// Stores a new product under the next free id.
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, ProductRejection> {
        let mut data = self.inner.write().await;
        data.check_category(input.category_id)?;
        data.last_product_id += 1;
        let product = input.into_product(data.last_product_id);
        data.products.push(product.clone());
        Ok(product)
    }

    /// Replaces every field of product `id`.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<Product, ProductRejection> {
        let mut data = self.inner.write().await;
        data.check_category(input.category_id)?;
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProductRejection::NotFound)?;
        *slot = input.into_product(id);
        Ok(slot.clone())
    }

    /// Returns `false` if there was no such product. Cart lines keep their copy.
    pub async fn delete_product(&self, id: ProductId) -> bool {
        let mut data = self.inner.write().await;
        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        data.products.len() != before
    }

    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.inner
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub async fn cart(&self) -> Vec<CartItemRecord> {
        self.inner.read().await.cart.clone()
    }

    /// Stores a new cart line. Returns `None` if the product does not exist.
    pub async fn add_cart_item(&self, item: &NewCartItem) -> Option<CartItemRecord> {
        let mut data = self.inner.write().await;
        let product = data
            .products
            .iter()
            .find(|p| p.id == item.product_id)
            .cloned()?;
        data.last_cart_id += 1;
        let record = CartItemRecord {
            id: data.last_cart_id,
            product_id: product.id,
            product,
            quantity: item.quantity,
        };
        data.cart.push(record.clone());
        Some(record)
    }

    /// Drops every cart line and returns how many there were.
    pub async fn clear_cart(&self) -> u64 {
        let mut data = self.inner.write().await;
        let removed = data.cart.len() as u64;
        data.cart.clear();
        removed
    }

    pub async fn orders(&self) -> Vec<OrderReceipt> {
        self.inner.read().await.orders.clone()
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.inner.read().await.payments.clone()
    }

    /// Stores an already-validated payment and empties the cart.
    pub async fn record_payment(&self, request: PaymentRequest) -> Payment {
        let mut data = self.inner.write().await;
        data.last_payment_id += 1;
        let payment = request.into_payment(data.last_payment_id, Utc::now());
        data.payments.push(payment.clone());
        data.cart.clear();
        payment
    }

    /// Stores an already-validated order and empties the cart.
    pub async fn record_order(&self, order: OrderRequest) -> OrderReceipt {
        let mut data = self.inner.write().await;
        data.last_order_id += 1;
        let receipt = order.into_receipt(data.last_order_id, Utc::now());
        data.orders.push(receipt.clone());
        data.cart.clear();
        receipt
    }
}

impl ShopData {
    fn check_category(&self, id: Option<CategoryId>) -> Result<(), ProductRejection> {
        match id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => {
                Err(ProductRejection::UnknownCategory(id))
            }
            _ => Ok(()),
        }
    }
}

fn seed_categories() -> Vec<ProductCategory> {
    ["Electronics", "Books", "Clothing", "Toys", "Groceries"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| ProductCategory {
            id,
            name: name.to_owned(),
        })
        .collect()
}

// Every seeded product is in Electronics.
fn seed_products() -> Vec<Product> {
    [
        (1, "Laptop", "Powerful laptop for developers", Decimal::new(399_999, 2)),
        (2, "Smartphone", "Smartphone running the latest system", Decimal::new(199_999, 2)),
        (3, "Headphones", "Noise-cancelling headphones", Decimal::new(39_999, 2)),
        (4, "Computer mouse", "Ergonomic wireless mouse", Decimal::new(14_999, 2)),
    ]
    .into_iter()
    .map(|(id, name, description, price)| Product {
        id,
        name: name.to_owned(),
        description: description.to_owned(),
        price,
        image_url: PLACEHOLDER_IMAGE.to_owned(),
        category_id: Some(1),
    })
    .collect()
}
