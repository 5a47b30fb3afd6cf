//! Reusable field validators
//!
//! Each validator returns the [`ValidationError`] whose message is shown to
//! API clients.

use crate::core::error::ValidationError;
use crate::core::field::FieldFormat;
use rust_decimal::Decimal;

/// Validator: phone is absent, empty, or matches [`FieldFormat::Phone`]
pub fn phone(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(phone) if !phone.is_empty() && !FieldFormat::Phone.validate(phone) => {
            Err(ValidationError::InvalidPhone)
        }
        _ => Ok(()),
    }
}

/// Validator: price must be strictly positive
pub fn positive_price(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        Err(ValidationError::NonPositivePrice)
    } else {
        Ok(())
    }
}

/// Validator: stock must not be negative
pub fn non_negative_stock(stock: i32) -> Result<(), ValidationError> {
    if stock < 0 {
        Err(ValidationError::NegativeStock)
    } else {
        Ok(())
    }
}

/// Validator: at least one item selected
pub fn non_empty_selection<T>(items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        Err(ValidationError::NoProductSelected)
    } else {
        Ok(())
    }
}

/// Parse an opaque identifier into a storage id, mapping failure to `err`
pub fn parse_id(raw: &str, err: ValidationError) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(err)
}
