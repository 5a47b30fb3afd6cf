//! GraphQL schema: query root and schema assembly

use super::IntoGraphQLError;
use super::inputs::{CustomerFilterInput, OrderFilterInput, ProductFilterInput};
use super::mutations::MutationRoot;
use super::types::{CustomerNode, OrderNode, ProductNode};
use crate::entities::{Customer, Order, OrderFilter, Product};
use crate::server::host::ServerHost;
use async_graphql::*;
use std::sync::Arc;

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the executable schema over a host
pub fn build_schema(host: Arc<ServerHost>) -> CrmSchema {
    Schema::build(
        QueryRoot { host: host.clone() },
        MutationRoot { host },
        EmptySubscription,
    )
    .finish()
}

pub struct QueryRoot {
    pub(super) host: Arc<ServerHost>,
}

#[Object]
impl QueryRoot {
    async fn hello(&self) -> &'static str {
        "Hello, GraphQL!"
    }

    /// List customers
    ///
    /// `orderBy` accepts `id`, `name`, `email` or `created_at`, optionally
    /// suffixed with `:asc` or `:desc`.
    async fn customers(
        &self,
        filter: Option<CustomerFilterInput>,
        order_by: Option<String>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<CustomerNode>> {
        let params = self
            .host
            .list_params::<Customer>(order_by.as_deref(), limit, offset)
            .into_graphql()?;
        let filter = filter.unwrap_or_default().into();

        let customers = self
            .host
            .service
            .list_customers(&filter, &params)
            .await
            .into_graphql()?;
        Ok(customers
            .into_iter()
            .map(|c| CustomerNode::new(c, self.host.clone()))
            .collect())
    }

    /// List products
    ///
    /// `orderBy` accepts `id`, `name`, `price` or `stock`.
    async fn products(
        &self,
        filter: Option<ProductFilterInput>,
        order_by: Option<String>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<ProductNode>> {
        let params = self
            .host
            .list_params::<Product>(order_by.as_deref(), limit, offset)
            .into_graphql()?;
        let filter = filter.unwrap_or_default().into();

        let products = self
            .host
            .service
            .list_products(&filter, &params)
            .await
            .into_graphql()?;
        Ok(products
            .into_iter()
            .map(|p| ProductNode::new(p, self.host.clone()))
            .collect())
    }

    /// List orders
    ///
    /// `orderBy` accepts `id`, `total_amount` or `order_date`.
    async fn orders(
        &self,
        filter: Option<OrderFilterInput>,
        order_by: Option<String>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<OrderNode>> {
        let params = self
            .host
            .list_params::<Order>(order_by.as_deref(), limit, offset)
            .into_graphql()?;
        let filter = OrderFilter::try_from(filter.unwrap_or_default()).into_graphql()?;

        let orders = self
            .host
            .service
            .list_orders(&filter, &params)
            .await
            .into_graphql()?;
        Ok(OrderNode::wrap_all(orders, &self.host))
    }
}
