//! HTTP client for the shop backend.
//!
//! Success bodies may come wrapped in a `{data, meta}` envelope or bare.
//! Failures may be `{error: {code, message}}`, `{error: "..."}` or
//! `{message: "..."}`; all of them become [`StorefrontError::Rejected`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use shopbot_core::{
    CartItemRecord, NewCartItem, OrderReceipt, OrderRequest, Payment, PaymentRequest, Product,
    ProductId,
};

use crate::error::StorefrontError;
use crate::types::{unwrap_data, ErrorEnvelope};

/// Client for the shop backend REST API.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: Url,
}

impl StorefrontClient {
    /// Creates a client rooted at `base_url`, e.g. `http://localhost:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StorefrontError::InvalidBaseUrl`] if
    /// `base_url` is not a valid absolute URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| StorefrontError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(StorefrontError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Lists every product the backend sells.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError`] on transport, status, or decoding failure.
    pub async fn list_products(&self) -> Result<Vec<Product>, StorefrontError> {
        let url = self.endpoint(&["products"])?;
        self.send(self.client.get(url.clone()), &url).await
    }

    /// Fetches one product.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] when the backend answers
    /// 404, otherwise the same errors as [`StorefrontClient::list_products`].
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, StorefrontError> {
        let id = product_id.to_string();
        let url = self.endpoint(&["products", &id])?;
        match self.send(self.client.get(url.clone()), &url).await {
            Err(StorefrontError::NotFound { .. }) => Err(StorefrontError::UnknownProduct(product_id)),
            other => other,
        }
    }

    /// Lists the lines of the backend-side cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError`] on transport, status, or decoding failure.
    pub async fn list_cart(&self) -> Result<Vec<CartItemRecord>, StorefrontError> {
        let url = self.endpoint(&["cart"])?;
        self.send(self.client.get(url.clone()), &url).await
    }

    /// Records a product in the backend-side cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] when the backend does not
    /// know the product, [`StorefrontError::Rejected`] for other refusals.
    pub async fn add_cart_line(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItemRecord, StorefrontError> {
        let url = self.endpoint(&["cart"])?;
        let body = NewCartItem {
            product_id,
            quantity,
        };
        match self
            .send(self.client.post(url.clone()).json(&body), &url)
            .await
        {
            Err(StorefrontError::NotFound { .. }) => Err(StorefrontError::UnknownProduct(product_id)),
            other => other,
        }
    }

    /// Empties the backend-side cart and returns how many lines it held.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError`] on transport, status, or decoding failure.
    pub async fn clear_remote_cart(&self) -> Result<u64, StorefrontError> {
        #[derive(serde::Deserialize)]
        struct Cleared {
            removed: u64,
        }

        let url = self.endpoint(&["cart"])?;
        let cleared: Cleared = self.send(self.client.delete(url.clone()), &url).await?;
        Ok(cleared.removed)
    }

    /// Submits a card payment.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Rejected`] when the backend refuses the
    /// payment, with the offending fields in `details`.
    pub async fn submit_payment(&self, request: &PaymentRequest) -> Result<Payment, StorefrontError> {
        let url = self.endpoint(&["payments"])?;
        self.send(self.client.post(url.clone()).json(request), &url)
            .await
    }

    /// Lists previously processed payments, newest last.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError`] on transport, status, or decoding failure.
    pub async fn list_payments(&self) -> Result<Vec<Payment>, StorefrontError> {
        let url = self.endpoint(&["payments"])?;
        self.send(self.client.get(url.clone()), &url).await
    }

    /// Submits an order.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Rejected`] when the backend refuses the
    /// order, with the offending fields in `details`.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt, StorefrontError> {
        let url = self.endpoint(&["orders"])?;
        self.send(self.client.post(url.clone()).json(order), &url)
            .await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorefrontError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorefrontError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, StorefrontError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let decode_error = |e: serde_json::Error| StorefrontError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            };
            let value: serde_json::Value = serde_json::from_str(&body).map_err(decode_error)?;
            return serde_json::from_value(unwrap_data(value)).map_err(decode_error);
        }

        tracing::debug!(status = status.as_u16(), url = %url, "storefront request failed");

        if status == StatusCode::NOT_FOUND {
            return Err(StorefrontError::NotFound {
                url: url.to_string(),
            });
        }

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => {
                let (code, message, details) = envelope.into_parts();
                Err(StorefrontError::Rejected {
                    status: status.as_u16(),
                    code,
                    message,
                    details,
                })
            }
            Err(_) => Err(StorefrontError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
