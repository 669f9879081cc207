//! Card payment requests, stored payments, and server-side field validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status token returned for a processed payment or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    #[serde(other)]
    Other,
}

/// Card payment as submitted by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default, with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_holder: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

/// A processed payment as kept in the payment history. Card data is masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String,
    pub status: PaymentStatus,
    /// Absent from backends that do not timestamp payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl PaymentRequest {
    /// Checks every field and reports the first problem with each.
    ///
    /// # Errors
    ///
    /// Returns the list of rejected fields when any check fails.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        check(&mut errors, "cardNumber", check_card_number(&self.card_number));
        if self.card_holder.trim().is_empty() {
            errors.push(FieldError::new("cardHolder", "card holder is required"));
        }
        check(&mut errors, "expiryDate", check_expiry_date(&self.expiry_date));
        check(&mut errors, "cvv", check_cvv(&self.cvv));
        if self.amount <= Decimal::ZERO {
            errors.push(FieldError::new("amount", "amount must be greater than zero"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds the history record for an accepted payment.
    #[must_use]
    pub fn into_payment(self, id: u64, created_at: DateTime<Utc>) -> Payment {
        Payment {
            id,
            amount: self.amount,
            card_number: mask_card_number(&self.card_number),
            card_holder: self.card_holder.trim().to_string(),
            expiry_date: self.expiry_date,
            status: PaymentStatus::Completed,
            created_at: Some(created_at),
        }
    }
}

pub(crate) fn check(errors: &mut Vec<FieldError>, field: &str, result: Result<(), &str>) {
    if let Err(message) = result {
        errors.push(FieldError::new(field, message));
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn check_card_number(raw: &str) -> Result<(), &'static str> {
    if raw.trim().is_empty() {
        return Err("card number is required");
    }
    let digits: String = raw.chars().filter(|c| *c != ' ').collect();
    if digits.len() != 16 || !is_numeric(&digits) {
        return Err("card number must be 16 digits");
    }
    Ok(())
}

/// Accepts `MM/YY` with a month between 01 and 12.
pub(crate) fn check_expiry_date(raw: &str) -> Result<(), &'static str> {
    if raw.trim().is_empty() {
        return Err("expiry date is required");
    }
    let invalid = Err("expiry date must use MM/YY");
    let Some((month, year)) = raw.split_once('/') else {
        return invalid;
    };
    if month.len() != 2 || year.len() != 2 || !is_numeric(month) || !is_numeric(year) {
        return invalid;
    }
    match month.parse::<u8>() {
        Ok(1..=12) => Ok(()),
        _ => invalid,
    }
}

pub(crate) fn check_cvv(raw: &str) -> Result<(), &'static str> {
    if raw.trim().is_empty() {
        return Err("CVV is required");
    }
    if !(3..=4).contains(&raw.len()) || !is_numeric(raw) {
        return Err("CVV must be 3 or 4 digits");
    }
    Ok(())
}

/// Keeps only the last four digits, e.g. `**** **** **** 3456`.
#[must_use]
pub fn mask_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    let last4: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {last4}")
}
