//! In-memory implementation of CrmStore for testing and development

use crate::core::error::StorageError;
use crate::core::query::ListParams;
use crate::core::store::{CrmStore, CrmTransaction};
use crate::entities::{
    Customer, CustomerFilter, NewCustomer, NewOrder, NewProduct, Order, OrderFilter, Product,
    ProductFilter,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

#[derive(Clone, Debug, Default)]
struct Tables {
    customers: BTreeMap<i64, Customer>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    next_customer_id: i64,
    next_product_id: i64,
    next_order_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory CRM store
///
/// Ids are assigned from 1 per table. A transaction holds the write lock
/// for its whole lifetime and works on a staged copy of the tables that
/// replaces the live ones on commit.
#[derive(Clone, Default)]
pub struct InMemoryCrmStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCrmStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrmStore for InMemoryCrmStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn begin(&self) -> Result<Box<dyn CrmTransaction>, StorageError> {
        let guard = self.tables.clone().write_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StorageError> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn list_customers(
        &self,
        filter: &CustomerFilter,
        params: &ListParams,
    ) -> Result<Vec<Customer>, StorageError> {
        let tables = self.tables.read().await;
        let matching = tables
            .customers
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        Ok(params.apply(matching))
    }

    async fn get_products(&self, ids: &[i64]) -> Result<Vec<Product>, StorageError> {
        let tables = self.tables.read().await;
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tables.products.get(&id).cloned())
            .collect())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        params: &ListParams,
    ) -> Result<Vec<Product>, StorageError> {
        let tables = self.tables.read().await;
        let matching = tables
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        Ok(params.apply(matching))
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        params: &ListParams,
    ) -> Result<Vec<Order>, StorageError> {
        let tables = self.tables.read().await;
        let matching = tables
            .orders
            .values()
            .filter(|order| {
                let customer_name = tables
                    .customers
                    .get(&order.customer_id)
                    .map(|c| c.name.as_str());
                let product_names: Vec<&str> = order
                    .product_ids
                    .iter()
                    .filter_map(|id| tables.products.get(id))
                    .map(|p| p.name.as_str())
                    .collect();
                filter.matches(order, customer_name, &product_names)
            })
            .cloned()
            .collect();
        Ok(params.apply(matching))
    }
}

/// Write transaction over the in-memory tables
struct InMemoryTransaction {
    guard: OwnedRwLockWriteGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl CrmTransaction for InMemoryTransaction {
    async fn email_exists(&mut self, email: &str) -> Result<bool, StorageError> {
        Ok(self.staged.customers.values().any(|c| c.email == email))
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<Customer, StorageError> {
        if self.email_exists(&customer.email).await? {
            return Err(StorageError::UniqueViolation {
                entity: "customer",
                field: "email",
            });
        }

        let id = next_id(&mut self.staged.next_customer_id);
        let customer = customer.into_customer(id, Utc::now());
        self.staged.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn insert_product(&mut self, product: NewProduct) -> Result<Product, StorageError> {
        let id = next_id(&mut self.staged.next_product_id);
        let product = product.into_product(id);
        self.staged.products.insert(id, product.clone());
        Ok(product)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, StorageError> {
        if !self.staged.customers.contains_key(&order.customer_id) {
            return Err(StorageError::Transaction {
                message: format!("customer {} does not exist", order.customer_id),
            });
        }
        if let Some(missing) = order
            .product_ids
            .iter()
            .find(|id| !self.staged.products.contains_key(id))
        {
            return Err(StorageError::Transaction {
                message: format!("product {} does not exist", missing),
            });
        }

        let id = next_id(&mut self.staged.next_order_id);
        let order = order.into_order(id);
        self.staged.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let InMemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        Ok(())
    }
}
