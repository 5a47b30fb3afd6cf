//! Order model and filter set

use crate::core::entity::{Data, Entity};
use crate::core::field::FieldValue;
use crate::core::query::{day_end_exclusive, day_start, icontains};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted order
///
/// `total_amount` is the sum of the product prices at creation time and is
/// never recomputed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Ascending, without duplicates
    pub product_ids: Vec<i64>,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
}

impl Entity for Order {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Data for Order {
    fn sortable_fields() -> &'static [&'static str] {
        &["id", "total_amount", "order_date"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "total_amount" => Some(FieldValue::Decimal(self.total_amount)),
            "order_date" => Some(FieldValue::DateTime(self.order_date)),
            _ => None,
        }
    }
}

/// A validated order ready to be stored
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: i64,
    pub product_ids: Vec<i64>,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
}

impl NewOrder {
    pub fn into_order(self, id: i64) -> Order {
        let mut product_ids = self.product_ids;
        product_ids.sort_unstable();
        product_ids.dedup();
        Order {
            id,
            customer_id: self.customer_id,
            product_ids,
            total_amount: self.total_amount,
            order_date: self.order_date,
        }
    }
}

/// Lookups accepted by the `orders` list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderFilter {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<NaiveDate>,
    pub order_date_lte: Option<NaiveDate>,
    /// Case-insensitive substring of the customer's name
    pub customer_name: Option<String>,
    /// Case-insensitive substring of any ordered product's name
    pub product_name: Option<String>,
    /// Order contains this product
    pub product_id: Option<i64>,
    /// Order belongs to this customer (reverse relation lookups)
    pub customer_id: Option<i64>,
}

impl OrderFilter {
    /// Filter for the orders placed by one customer
    pub fn for_customer(customer_id: i64) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Default::default()
        }
    }

    /// Filter for the orders containing one product
    pub fn for_product(product_id: i64) -> Self {
        Self {
            product_id: Some(product_id),
            ..Default::default()
        }
    }

    /// Evaluate the filter against an order joined with its customer's
    /// name and its products' names.
    pub fn matches(&self, order: &Order, customer_name: Option<&str>, product_names: &[&str]) -> bool {
        if self.customer_id.is_some_and(|id| order.customer_id != id) {
            return false;
        }
        if self.product_id.is_some_and(|id| !order.product_ids.contains(&id)) {
            return false;
        }
        if self.total_amount_gte.is_some_and(|min| order.total_amount < min) {
            return false;
        }
        if self.total_amount_lte.is_some_and(|max| order.total_amount > max) {
            return false;
        }
        if let Some(date) = self.order_date_gte {
            if order.order_date < day_start(date) {
                return false;
            }
        }
        if let Some(date) = self.order_date_lte {
            if order.order_date >= day_end_exclusive(date) {
                return false;
            }
        }
        if let Some(needle) = &self.customer_name {
            if !customer_name.is_some_and(|name| icontains(name, needle)) {
                return false;
            }
        }
        if let Some(needle) = &self.product_name {
            if !product_names.iter().any(|name| icontains(name, needle)) {
                return false;
            }
        }
        true
    }
}
