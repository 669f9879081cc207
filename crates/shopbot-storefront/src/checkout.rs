//! Storefront flows that touch both the local cart and the shop backend.

use shopbot_core::{
    Cart, CartItemRecord, CustomerDetails, OrderCard, OrderReceipt, OrderRequest, Payment,
    PaymentRequest, PaymentStatus, Product, ProductId,
};

use crate::cart_store::CartStore;
use crate::client::StorefrontClient;
use crate::error::StorefrontError;

/// Card details entered on the payment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String,
    pub cvv: String,
}

/// A local cart bound to a shop backend.
#[derive(Debug)]
pub struct Storefront {
    client: StorefrontClient,
    store: CartStore,
}

impl Storefront {
    #[must_use]
    pub fn new(client: StorefrontClient, store: CartStore) -> Self {
        Self { client, store }
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        self.store.cart()
    }

    #[must_use]
    pub fn client(&self) -> &StorefrontClient {
        &self.client
    }

    /// Adds one unit of `product`.
    ///
    /// A product not yet in the cart is first recorded by the backend; the
    /// local cart is left untouched if that call fails. Adding more of a
    /// product already in the cart stays local.
    ///
    /// # Errors
    ///
    /// Returns the backend error, or [`StorefrontError::Storage`] if the cart
    /// cannot be persisted.
    pub async fn add_to_cart(&mut self, product: Product) -> Result<&Cart, StorefrontError> {
        if !self.store.cart().contains(product.id) {
            let record = self.client.add_cart_line(product.id, 1).await?;
            tracing::debug!(product_id = product.id, line_id = record.id, "backend cart line created");
        }
        self.store.add(product)
    }

    /// Looks the product up on the backend, then adds it like [`Storefront::add_to_cart`].
    ///
    /// Backends without a single-product route answer 404 there, so a miss
    /// falls back to searching the product list.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if the backend does not
    /// sell `product_id`.
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<&Cart, StorefrontError> {
        let product = match self.client.get_product(product_id).await {
            Ok(product) => product,
            Err(StorefrontError::UnknownProduct(_)) => self
                .client
                .list_products()
                .await?
                .into_iter()
                .find(|p| p.id == product_id)
                .ok_or(StorefrontError::UnknownProduct(product_id))?,
            Err(e) => return Err(e),
        };
        self.add_to_cart(product).await
    }

    /// Lines the backend has recorded for this shopper.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn remote_cart(&self) -> Result<Vec<CartItemRecord>, StorefrontError> {
        self.client.list_cart().await
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Result<&Cart, StorefrontError> {
        self.store.remove(product_id)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the cart cannot be persisted.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<&Cart, StorefrontError> {
        self.store.set_quantity(product_id, quantity)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the cart cannot be persisted.
    pub fn remove_line(&mut self, product_id: ProductId) -> Result<&Cart, StorefrontError> {
        self.store.remove_line(product_id)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<&Cart, StorefrontError> {
        self.store.clear()
    }

    /// Empties the backend cart, then the local one. Returns how many
    /// backend lines were dropped.
    ///
    /// # Errors
    ///
    /// Returns the backend error with the local cart untouched, or
    /// [`StorefrontError::Storage`] if the cleared cart cannot be persisted.
    pub async fn clear_cart_everywhere(&mut self) -> Result<u64, StorefrontError> {
        let removed = self.client.clear_remote_cart().await?;
        self.store.clear()?;
        tracing::info!(removed, "backend and local carts cleared");
        Ok(removed)
    }

    /// Pays the cart total with `card`.
    ///
    /// The cart is cleared only when the backend reports the payment as
    /// completed. Any other status is returned with the cart kept.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::EmptyCart`] without calling the backend
    /// when there is nothing to pay for, or the backend error otherwise.
    pub async fn pay(&mut self, card: CardDetails) -> Result<Payment, StorefrontError> {
        if self.store.cart().is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let request = PaymentRequest {
            amount: self.store.cart().total(),
            card_number: card.card_number,
            card_holder: card.card_holder,
            expiry_date: card.expiry_date,
            cvv: card.cvv,
        };
        let payment = self.client.submit_payment(&request).await?;

        if payment.status == PaymentStatus::Completed {
            self.store.clear()?;
            tracing::info!(payment_id = payment.id, amount = %payment.amount, "payment completed");
        } else {
            tracing::warn!(payment_id = payment.id, "payment not completed, cart kept");
        }
        Ok(payment)
    }

    /// Places an order for the cart contents.
    ///
    /// As with [`Storefront::pay`], the cart is cleared only when the receipt
    /// reports the order as completed.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::EmptyCart`] without calling the backend
    /// when the cart is empty, or the backend error otherwise.
    pub async fn place_order(
        &mut self,
        customer: CustomerDetails,
        card: OrderCard,
    ) -> Result<OrderReceipt, StorefrontError> {
        if self.store.cart().is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let order = OrderRequest::from_cart(self.store.cart(), customer, card);
        let receipt = self.client.submit_order(&order).await?;

        if receipt.status == PaymentStatus::Completed {
            self.store.clear()?;
            tracing::info!(order_id = receipt.id, total = %receipt.total, "order placed");
        } else {
            tracing::warn!(order_id = receipt.id, "order not completed, cart kept");
        }
        Ok(receipt)
    }
}
