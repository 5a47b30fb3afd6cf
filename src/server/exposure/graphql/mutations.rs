//! Mutation root and payloads

use super::IntoGraphQLError;
use super::inputs::CustomerInput;
use super::types::{CustomerNode, OrderNode, ProductNode};
use crate::entities::{NewCustomer, NewProduct};
use crate::server::host::ServerHost;
use async_graphql::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

pub const CUSTOMER_CREATED_MESSAGE: &str = "Customer created successfully";

#[derive(SimpleObject)]
#[graphql(name = "CreateCustomer")]
pub struct CreateCustomerPayload {
    pub customer: CustomerNode,
    pub message: String,
}

#[derive(SimpleObject)]
#[graphql(name = "BulkCreateCustomers")]
pub struct BulkCreateCustomersPayload {
    /// Rows that were persisted, in input order
    pub customers: Vec<CustomerNode>,
    /// `Row {n}: {message}` for every rejected row
    pub errors: Vec<String>,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateProduct")]
pub struct CreateProductPayload {
    pub product: ProductNode,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateOrder")]
pub struct CreateOrderPayload {
    pub order: OrderNode,
}

pub struct MutationRoot {
    pub(super) host: Arc<ServerHost>,
}

#[Object]
impl MutationRoot {
    /// Create a customer; the email must be unused
    #[graphql(name = "createCustomer")]
    async fn create_customer(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<CreateCustomerPayload> {
        let customer = self
            .host
            .service
            .create_customer(NewCustomer::new(name, email, phone))
            .await
            .into_graphql()?;

        Ok(CreateCustomerPayload {
            customer: CustomerNode::new(customer, self.host.clone()),
            message: CUSTOMER_CREATED_MESSAGE.to_string(),
        })
    }

    /// Create many customers, collecting per-row errors
    #[graphql(name = "bulkCreateCustomers")]
    async fn bulk_create_customers(
        &self,
        input: Vec<CustomerInput>,
    ) -> Result<BulkCreateCustomersPayload> {
        let rows = input.into_iter().map(NewCustomer::from).collect();
        let outcome = self
            .host
            .service
            .bulk_create_customers(rows)
            .await
            .into_graphql()?;

        Ok(BulkCreateCustomersPayload {
            customers: outcome
                .created
                .into_iter()
                .map(|c| CustomerNode::new(c, self.host.clone()))
                .collect(),
            errors: outcome.errors,
        })
    }

    /// Create a product; absent or null `stock` means 0
    #[graphql(name = "createProduct")]
    async fn create_product(
        &self,
        name: String,
        price: Decimal,
        stock: Option<i32>,
    ) -> Result<CreateProductPayload> {
        let product = self
            .host
            .service
            .create_product(NewProduct::new(name, price, stock.unwrap_or(0)))
            .await
            .into_graphql()?;

        Ok(CreateProductPayload {
            product: ProductNode::new(product, self.host.clone()),
        })
    }

    /// Create an order; the total is the sum of the products' prices
    #[graphql(name = "createOrder")]
    async fn create_order(
        &self,
        customer_id: ID,
        product_ids: Vec<ID>,
        order_date: Option<DateTime<Utc>>,
    ) -> Result<CreateOrderPayload> {
        let product_ids: Vec<String> = product_ids.into_iter().map(|id| id.0).collect();
        let order = self
            .host
            .service
            .create_order(&customer_id, &product_ids, order_date)
            .await
            .into_graphql()?;

        Ok(CreateOrderPayload {
            order: OrderNode::new(order, self.host.clone()),
        })
    }
}
