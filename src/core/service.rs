//! CRM service: validation plus persistence for every mutation and list
//!
//! The GraphQL resolvers are thin wrappers over [`CrmService`]; all
//! business rules live here so they can be exercised without a schema.

use crate::core::error::{CrmError, ValidationError};
use crate::core::query::ListParams;
use crate::core::store::{CrmStore, CrmTransaction};
use crate::core::validation::validators;
use crate::entities::{
    Customer, CustomerFilter, NewCustomer, NewOrder, NewProduct, Order, OrderFilter, Product,
    ProductFilter,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Result of a bulk customer creation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkCreateOutcome {
    /// Customers persisted, in input order
    pub created: Vec<Customer>,
    /// One `Row {n}: {message}` entry per rejected row (1-based)
    pub errors: Vec<String>,
}

/// Entry point for all CRM operations
#[derive(Clone)]
pub struct CrmService {
    store: Arc<dyn CrmStore>,
}

impl CrmService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    /// Create one customer
    ///
    /// Rejects a taken email first, then an invalid phone.
    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer, CrmError> {
        let mut tx = self.store.begin().await?;

        match insert_customer_row(tx.as_mut(), input).await {
            Ok(customer) => {
                tx.commit().await?;
                tracing::info!(customer_id = customer.id, "Customer created");
                Ok(customer)
            }
            Err(e) => {
                discard(tx).await;
                Err(e)
            }
        }
    }

    /// Create many customers in one transaction.
    ///
    /// A row failing validation is skipped and reported in
    /// [`BulkCreateOutcome::errors`]; the other rows are still committed.
    /// A storage failure aborts the whole batch.
    pub async fn bulk_create_customers(
        &self,
        rows: Vec<NewCustomer>,
    ) -> Result<BulkCreateOutcome, CrmError> {
        let mut tx = self.store.begin().await?;
        let mut outcome = BulkCreateOutcome::default();

        for (idx, row) in rows.into_iter().enumerate() {
            match insert_customer_row(tx.as_mut(), row).await {
                Ok(customer) => outcome.created.push(customer),
                Err(CrmError::Validation(e)) => {
                    tracing::warn!(row = idx + 1, error = %e, "Bulk customer row rejected");
                    outcome.errors.push(format!("Row {}: {}", idx + 1, e));
                }
                Err(e) => {
                    tracing::error!(row = idx + 1, error = %e, "Bulk customer creation aborted");
                    discard(tx).await;
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            created = outcome.created.len(),
            rejected = outcome.errors.len(),
            "Bulk customer creation committed"
        );
        Ok(outcome)
    }

    /// Create one product
    pub async fn create_product(&self, input: NewProduct) -> Result<Product, CrmError> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        match tx.insert_product(input).await {
            Ok(product) => {
                tx.commit().await?;
                tracing::info!(product_id = product.id, "Product created");
                Ok(product)
            }
            Err(e) => {
                discard(tx).await;
                Err(e.into())
            }
        }
    }

    /// Create an order for a customer over a set of products.
    ///
    /// The total is the sum of the referenced products' current prices.
    /// Every id must resolve to a distinct product, so unknown and
    /// repeated ids are both rejected.
    pub async fn create_order(
        &self,
        customer_id: &str,
        product_ids: &[String],
        order_date: Option<DateTime<Utc>>,
    ) -> Result<Order, CrmError> {
        validators::non_empty_selection(product_ids)?;

        let customer_id = validators::parse_id(customer_id, ValidationError::InvalidCustomerId)?;
        let customer = self
            .store
            .get_customer(customer_id)
            .await?
            .ok_or(ValidationError::InvalidCustomerId)?;

        let ids = product_ids
            .iter()
            .map(|raw| validators::parse_id(raw, ValidationError::InvalidProductId))
            .collect::<Result<Vec<_>, _>>()?;
        let products = self.store.get_products(&ids).await?;
        if products.len() != ids.len() {
            return Err(ValidationError::InvalidProductId.into());
        }

        let order = NewOrder {
            customer_id: customer.id,
            product_ids: products.iter().map(|p| p.id).collect(),
            total_amount: products.iter().map(|p| p.price).sum::<Decimal>(),
            order_date: order_date.unwrap_or_else(Utc::now),
        };

        let mut tx = self.store.begin().await?;
        match tx.insert_order(order).await {
            Ok(order) => {
                tx.commit().await?;
                tracing::info!(
                    order_id = order.id,
                    customer_id = order.customer_id,
                    total_amount = %order.total_amount,
                    "Order created"
                );
                Ok(order)
            }
            Err(e) => {
                discard(tx).await;
                Err(e.into())
            }
        }
    }

    pub async fn get_customer(&self, id: i64) -> Result<Option<Customer>, CrmError> {
        Ok(self.store.get_customer(id).await?)
    }

    pub async fn products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, CrmError> {
        Ok(self.store.get_products(ids).await?)
    }

    pub async fn list_customers(
        &self,
        filter: &CustomerFilter,
        params: &ListParams,
    ) -> Result<Vec<Customer>, CrmError> {
        Ok(self.store.list_customers(filter, params).await?)
    }

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        params: &ListParams,
    ) -> Result<Vec<Product>, CrmError> {
        Ok(self.store.list_products(filter, params).await?)
    }

    pub async fn list_orders(
        &self,
        filter: &OrderFilter,
        params: &ListParams,
    ) -> Result<Vec<Order>, CrmError> {
        Ok(self.store.list_orders(filter, params).await?)
    }
}

/// Run the customer checks and insert inside an open transaction
async fn insert_customer_row(
    tx: &mut dyn CrmTransaction,
    input: NewCustomer,
) -> Result<Customer, CrmError> {
    if tx.email_exists(&input.email).await? {
        return Err(ValidationError::DuplicateEmail.into());
    }
    input.validate()?;

    tx.insert_customer(input).await.map_err(|e| {
        if e.is_unique_violation_on("customer", "email") {
            CrmError::Validation(ValidationError::DuplicateEmail)
        } else {
            CrmError::Storage(e)
        }
    })
}

/// Roll back, logging instead of masking the original error
async fn discard(tx: Box<dyn CrmTransaction>) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, "Rollback failed");
    }
}
