//! GraphQL input objects and their conversion into domain filters

use crate::core::error::ValidationError;
use crate::core::validation::validators;
use crate::entities::{CustomerFilter, NewCustomer, OrderFilter, ProductFilter};
use async_graphql::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One row of `bulkCreateCustomers`
#[derive(InputObject, Clone, Debug)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<CustomerInput> for NewCustomer {
    fn from(input: CustomerInput) -> Self {
        NewCustomer::new(input.name, input.email, input.phone)
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct CustomerFilterInput {
    /// Case-insensitive substring
    pub name: Option<String>,
    /// Case-insensitive substring
    pub email: Option<String>,
    pub created_at_gte: Option<NaiveDate>,
    pub created_at_lte: Option<NaiveDate>,
    /// Phone prefix, e.g. "+1"
    pub phone_pattern: Option<String>,
}

impl From<CustomerFilterInput> for CustomerFilter {
    fn from(input: CustomerFilterInput) -> Self {
        CustomerFilter {
            name: input.name,
            email: input.email,
            created_at_gte: input.created_at_gte,
            created_at_lte: input.created_at_lte,
            phone_pattern: input.phone_pattern,
        }
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct ProductFilterInput {
    pub name: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
    /// `true` keeps products with stock below 10
    pub low_stock: Option<bool>,
}

impl From<ProductFilterInput> for ProductFilter {
    fn from(input: ProductFilterInput) -> Self {
        ProductFilter {
            name: input.name,
            price_gte: input.price_gte,
            price_lte: input.price_lte,
            stock_gte: input.stock_gte,
            stock_lte: input.stock_lte,
            low_stock: input.low_stock,
        }
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct OrderFilterInput {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<NaiveDate>,
    pub order_date_lte: Option<NaiveDate>,
    /// Case-insensitive substring of the customer's name
    pub customer_name: Option<String>,
    /// Case-insensitive substring of any product's name
    pub product_name: Option<String>,
    pub product_id: Option<ID>,
}

impl TryFrom<OrderFilterInput> for OrderFilter {
    type Error = ValidationError;

    fn try_from(input: OrderFilterInput) -> Result<Self, Self::Error> {
        let product_id = input
            .product_id
            .map(|id| validators::parse_id(&id, ValidationError::InvalidProductId))
            .transpose()?;

        Ok(OrderFilter {
            total_amount_gte: input.total_amount_gte,
            total_amount_lte: input.total_amount_lte,
            order_date_gte: input.order_date_gte,
            order_date_lte: input.order_date_lte,
            customer_name: input.customer_name,
            product_name: input.product_name,
            product_id,
            customer_id: None,
        })
    }
}
