//! Storage traits
//!
//! [`CrmStore`] is the seam between the service layer and a backend. Reads go
//! straight to the store; every write goes through a [`CrmTransaction`] so a
//! batch of inserts can be committed or rolled back as one unit.

use crate::core::error::StorageError;
use crate::core::query::ListParams;
use crate::entities::{
    Customer, CustomerFilter, NewCustomer, NewOrder, NewProduct, Order, OrderFilter, Product,
    ProductFilter,
};
use async_trait::async_trait;

/// Read access and transaction factory for a storage backend
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Backend name used in logs (e.g. "in-memory", "PostgreSQL")
    fn backend_name(&self) -> &'static str;

    /// Start a write transaction
    async fn begin(&self) -> Result<Box<dyn CrmTransaction>, StorageError>;

    /// Get a customer by id
    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StorageError>;

    /// List customers matching a filter
    async fn list_customers(
        &self,
        filter: &CustomerFilter,
        params: &ListParams,
    ) -> Result<Vec<Customer>, StorageError>;

    /// Get the distinct products whose id is in `ids`, in ascending id order.
    ///
    /// Unknown ids are skipped, so the result can be shorter than `ids`.
    async fn get_products(&self, ids: &[i64]) -> Result<Vec<Product>, StorageError>;

    /// List products matching a filter
    async fn list_products(
        &self,
        filter: &ProductFilter,
        params: &ListParams,
    ) -> Result<Vec<Product>, StorageError>;

    /// List orders matching a filter
    async fn list_orders(
        &self,
        filter: &OrderFilter,
        params: &ListParams,
    ) -> Result<Vec<Order>, StorageError>;
}

/// A write unit of work.
///
/// Each insert is isolated: when it fails, only that insert is undone and
/// the transaction stays usable. Dropping a transaction without calling
/// [`commit`](CrmTransaction::commit) discards its writes.
#[async_trait]
pub trait CrmTransaction: Send {
    /// Whether a customer with this exact email is visible to the transaction
    async fn email_exists(&mut self, email: &str) -> Result<bool, StorageError>;

    /// Insert a customer, failing with a unique violation on a taken email
    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<Customer, StorageError>;

    async fn insert_product(&mut self, product: NewProduct) -> Result<Product, StorageError>;

    /// Insert an order together with its product associations
    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, StorageError>;

    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
