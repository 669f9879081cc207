//! Checkout orders: customer details, card, and the cart's line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::payments::{
    check, check_card_number, check_cvv, check_expiry_date, FieldError, PaymentStatus,
};
use crate::products::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCard {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer: CustomerDetails,
    pub payment: OrderCard,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Acknowledgement returned once an order has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub id: u64,
    pub status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub item_count: u64,
    pub created_at: DateTime<Utc>,
}

impl OrderRequest {
    /// Builds an order for every line currently in `cart`.
    #[must_use]
    pub fn from_cart(cart: &Cart, customer: CustomerDetails, payment: OrderCard) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id(),
                quantity: line.quantity,
                price: line.product.price,
            })
            .collect();
        Self {
            customer,
            payment,
            items,
            total: cart.total(),
        }
    }

    /// Σ price × quantity over the submitted items, or `None` on overflow.
    #[must_use]
    pub fn items_total(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, i| {
            i.price
                .checked_mul(Decimal::from(i.quantity))
                .and_then(|line| acc.checked_add(line))
        })
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// # Errors
    ///
    /// Returns the list of rejected fields when any check fails.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.customer.full_name.trim().is_empty() {
            errors.push(FieldError::new("customer.fullName", "full name is required"));
        }
        let email = self.customer.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("customer.email", "email is required"));
        } else if !email.contains('@') {
            errors.push(FieldError::new("customer.email", "email is not valid"));
        }
        if self.customer.address.trim().is_empty() {
            errors.push(FieldError::new("customer.address", "address is required"));
        }

        check(
            &mut errors,
            "payment.cardNumber",
            check_card_number(&self.payment.card_number),
        );
        check(
            &mut errors,
            "payment.expiryDate",
            check_expiry_date(&self.payment.expiry_date),
        );
        check(&mut errors, "payment.cvv", check_cvv(&self.payment.cvv));

        if self.items.is_empty() {
            errors.push(FieldError::new("items", "order has no items"));
        } else if self.items.iter().any(|i| i.quantity == 0) {
            errors.push(FieldError::new("items", "every item needs a quantity of at least 1"));
        } else {
            match self.items_total() {
                None => errors.push(FieldError::new("items", "item totals are too large")),
                Some(sum) if sum.round_dp(2) != self.total.round_dp(2) => {
                    errors.push(FieldError::new("total", "total does not match the items"));
                }
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub fn into_receipt(self, id: u64, created_at: DateTime<Utc>) -> OrderReceipt {
        OrderReceipt {
            id,
            status: PaymentStatus::Completed,
            item_count: self.item_count(),
            total: self.total,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartAction;
    use crate::products::Product;

    fn cart() -> Cart {
        let laptop = Product {
            id: 1,
            name: "Laptop".to_string(),
            description: "A fast laptop for developers".to_string(),
            price: Decimal::new(3999_99, 2),
            image_url: "https://via.placeholder.com/150".to_string(),
            category_id: None,
        };
        let mouse = Product {
            id: 4,
            name: "Computer mouse".to_string(),
            description: "Wireless ergonomic mouse".to_string(),
            price: Decimal::new(149_99, 2),
            image_url: "https://via.placeholder.com/150".to_string(),
            category_id: None,
        };
        Cart::new()
            .reduce(&CartAction::Add(laptop))
            .reduce(&CartAction::Add(mouse.clone()))
            .reduce(&CartAction::Add(mouse))
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            full_name: "Jan Kowalski".to_string(),
            email: "jan@example.com".to_string(),
            address: "ul. Długa 1, Kraków".to_string(),
        }
    }

    fn card() -> OrderCard {
        OrderCard {
            card_number: "1234 5678 9012 3456".to_string(),
            expiry_date: "09/29".to_string(),
            cvv: "321".to_string(),
        }
    }

    #[test]
    fn from_cart_copies_lines_and_total() {
        let order = OrderRequest::from_cart(&cart(), customer(), card());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 2);
        assert_eq!(order.total, Decimal::new(4299_97, 2));
        assert_eq!(order.item_count(), 3);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn empty_order_is_rejected() {
        let order = OrderRequest::from_cart(&Cart::new(), customer(), card());
        let errors = order.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "items");
    }

    #[test]
    fn mismatched_total_is_rejected() {
        let mut order = OrderRequest::from_cart(&cart(), customer(), card());
        order.total = Decimal::ONE;
        let errors = order.validate().unwrap_err();
        assert_eq!(errors[0].field, "total");
    }

    #[test]
    fn overflowing_item_totals_are_rejected() {
        let mut order = OrderRequest::from_cart(&cart(), customer(), card());
        order.items = vec![OrderItem {
            product_id: 1,
            quantity: 4_000_000_000,
            price: Decimal::from_str_exact("70000000000000000000000000000").expect("decimal"),
        }];
        assert_eq!(order.items_total(), None);
        let errors = order.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "items");
    }

    #[test]
    fn customer_fields_are_checked() {
        let order = OrderRequest::from_cart(
            &cart(),
            CustomerDetails {
                full_name: String::new(),
                email: "not-an-email".to_string(),
                address: " ".to_string(),
            },
            card(),
        );
        let errors = order.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["customer.fullName", "customer.email", "customer.address"]
        );
    }

    #[test]
    fn wire_format_matches_checkout_payload() {
        let order = OrderRequest::from_cart(&cart(), customer(), card());
        let json = serde_json::to_value(&order).expect("serialize");
        assert_eq!(json["customer"]["fullName"], "Jan Kowalski");
        assert_eq!(json["payment"]["expiryDate"], "09/29");
        assert_eq!(json["items"][0]["productId"], 1);
        assert_eq!(json["items"][0]["price"].as_f64(), Some(3999.99));
    }

    #[test]
    fn receipt_reports_completed() {
        let order = OrderRequest::from_cart(&cart(), customer(), card());
        let receipt = order.into_receipt(1, Utc::now());
        assert_eq!(receipt.status, PaymentStatus::Completed);
        assert_eq!(receipt.item_count, 3);
    }
}
