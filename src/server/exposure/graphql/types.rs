//! GraphQL object types
//!
//! Each node wraps a stored entity together with the host, so relation
//! fields can be resolved lazily through the service.

use super::IntoGraphQLError;
use crate::core::error::CrmError;
use crate::core::query::ListParams;
use crate::entities::{Customer, Order, OrderFilter, Product};
use crate::server::host::ServerHost;
use async_graphql::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct CustomerNode {
    pub customer: Customer,
    pub(super) host: Arc<ServerHost>,
}

impl CustomerNode {
    pub fn new(customer: Customer, host: Arc<ServerHost>) -> Self {
        Self { customer, host }
    }
}

#[Object(name = "Customer")]
impl CustomerNode {
    async fn id(&self) -> ID {
        ID::from(self.customer.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.customer.name
    }

    async fn email(&self) -> &str {
        &self.customer.email
    }

    async fn phone(&self) -> Option<&str> {
        self.customer.phone.as_deref()
    }

    #[graphql(name = "createdAt")]
    async fn created_at(&self) -> DateTime<Utc> {
        self.customer.created_at
    }

    /// Orders placed by this customer
    async fn orders(&self) -> Result<Vec<OrderNode>> {
        let orders = self
            .host
            .service
            .list_orders(&OrderFilter::for_customer(self.customer.id), &ListParams::default())
            .await
            .into_graphql()?;
        Ok(OrderNode::wrap_all(orders, &self.host))
    }
}

pub struct ProductNode {
    pub product: Product,
    pub(super) host: Arc<ServerHost>,
}

impl ProductNode {
    pub fn new(product: Product, host: Arc<ServerHost>) -> Self {
        Self { product, host }
    }
}

#[Object(name = "Product")]
impl ProductNode {
    async fn id(&self) -> ID {
        ID::from(self.product.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.product.name
    }

    async fn price(&self) -> Decimal {
        self.product.price
    }

    async fn stock(&self) -> i32 {
        self.product.stock
    }

    /// Orders containing this product
    async fn orders(&self) -> Result<Vec<OrderNode>> {
        let orders = self
            .host
            .service
            .list_orders(&OrderFilter::for_product(self.product.id), &ListParams::default())
            .await
            .into_graphql()?;
        Ok(OrderNode::wrap_all(orders, &self.host))
    }
}

pub struct OrderNode {
    pub order: Order,
    pub(super) host: Arc<ServerHost>,
}

impl OrderNode {
    pub fn new(order: Order, host: Arc<ServerHost>) -> Self {
        Self { order, host }
    }

    pub(super) fn wrap_all(orders: Vec<Order>, host: &Arc<ServerHost>) -> Vec<Self> {
        orders
            .into_iter()
            .map(|order| Self::new(order, host.clone()))
            .collect()
    }
}

#[Object(name = "Order")]
impl OrderNode {
    async fn id(&self) -> ID {
        ID::from(self.order.id.to_string())
    }

    async fn customer(&self) -> Result<CustomerNode> {
        let customer = self
            .host
            .service
            .get_customer(self.order.customer_id)
            .await
            .into_graphql()?
            .ok_or_else(|| {
                CrmError::Internal(format!(
                    "order {} references missing customer {}",
                    self.order.id, self.order.customer_id
                ))
                .extend()
            })?;
        Ok(CustomerNode::new(customer, self.host.clone()))
    }

    /// Products in ascending id order
    async fn products(&self) -> Result<Vec<ProductNode>> {
        let products = self
            .host
            .service
            .products_by_ids(&self.order.product_ids)
            .await
            .into_graphql()?;
        Ok(products
            .into_iter()
            .map(|p| ProductNode::new(p, self.host.clone()))
            .collect())
    }

    #[graphql(name = "totalAmount")]
    async fn total_amount(&self) -> Decimal {
        self.order.total_amount
    }

    #[graphql(name = "orderDate")]
    async fn order_date(&self) -> DateTime<Utc> {
        self.order.order_date
    }
}
