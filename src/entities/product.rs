//! Product model and filter set

use crate::core::entity::{Data, Entity};
use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use crate::core::query::icontains;
use crate::core::validation::validators;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Products with stock strictly below this count as low stock
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Decimal places kept for money amounts
pub const PRICE_SCALE: u32 = 2;

/// Round to cents, half away from zero, always carrying two decimals
pub fn round_price(price: Decimal) -> Decimal {
    let mut rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// A persisted product
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

impl Entity for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Data for Product {
    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "price", "stock"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "name" => Some(FieldValue::String(self.name.clone())),
            "price" => Some(FieldValue::Decimal(self.price)),
            "stock" => Some(FieldValue::Integer(self.stock as i64)),
            _ => None,
        }
    }
}

/// Input for creating a product
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, stock: i32) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
        }
    }

    /// The price as persisted, rounded to cents
    pub fn stored_price(&self) -> Decimal {
        round_price(self.price)
    }

    /// Price is checked before stock, after rounding
    pub fn validate(&self) -> Result<(), ValidationError> {
        validators::positive_price(self.stored_price())?;
        validators::non_negative_stock(self.stock)
    }

    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            price: self.stored_price(),
            name: self.name,
            stock: self.stock,
        }
    }
}

/// Lookups accepted by the `products` list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// `Some(true)` keeps products below [`LOW_STOCK_THRESHOLD`]
    pub low_stock: Option<bool>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(name) = &self.name {
            if !icontains(&product.name, name) {
                return false;
            }
        }
        if self.price_gte.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.price_lte.is_some_and(|max| product.price > max) {
            return false;
        }
        if self.stock_gte.is_some_and(|min| product.stock < min) {
            return false;
        }
        if self.stock_lte.is_some_and(|max| product.stock > max) {
            return false;
        }
        if self.low_stock == Some(true) && product.stock >= LOW_STOCK_THRESHOLD {
            return false;
        }
        true
    }
}
