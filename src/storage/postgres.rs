//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresCrmStore`], backed by a `sqlx::PgPool`. The schema lives
//! in `migrations/` and is applied with [`PostgresCrmStore::migrate`].
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! crm-graphql = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::entity::Data;
use crate::core::error::StorageError;
use crate::core::query::{ListParams, SortSpec, day_end_exclusive, day_start};
use crate::core::store::{CrmStore, CrmTransaction};
use crate::entities::{
    Customer, CustomerFilter, LOW_STOCK_THRESHOLD, NewCustomer, NewOrder, NewProduct, Order,
    OrderFilter, Product, ProductFilter,
};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Postgres, QueryBuilder, Transaction};

const ORDER_COLUMNS: &str = "o.id, o.customer_id, \
     ARRAY(SELECT op.product_id FROM order_products op \
           WHERE op.order_id = o.id ORDER BY op.product_id) AS product_ids, \
     o.total_amount, o.order_date";

/// CRM store backed by PostgreSQL
#[derive(Clone, Debug)]
pub struct PostgresCrmStore {
    pool: PgPool,
}

impl PostgresCrmStore {
    /// Create a new `PostgresCrmStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations (idempotent)
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Backend {
                backend: "PostgreSQL",
                message: format!("migration failed: {}", e),
            })
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE
fn like_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", like_escape(value))
}

/// Append ORDER BY / LIMIT / OFFSET.
///
/// The column name is only ever taken from `T::sortable_fields()`, never
/// from raw input.
fn push_list_params<T: Data>(qb: &mut QueryBuilder<'_, Postgres>, alias: &str, params: &ListParams) {
    let default_sort = SortSpec::default();
    let sort = if T::sortable_fields().contains(&params.sort.field.as_str()) {
        &params.sort
    } else {
        &default_sort
    };

    qb.push(" ORDER BY ")
        .push(alias)
        .push(sort.field.as_str())
        .push(" ")
        .push(sort.direction())
        .push(", ")
        .push(alias)
        .push("id ASC");

    if let Some(limit) = params.limit {
        qb.push(" LIMIT ").push_bind(limit as i64);
    }
    if params.offset > 0 {
        qb.push(" OFFSET ").push_bind(params.offset as i64);
    }
}

fn map_customer_insert_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::UniqueViolation {
            entity: "customer",
            field: "email",
        },
        _ => err.into(),
    }
}

#[async_trait]
impl CrmStore for PostgresCrmStore {
    fn backend_name(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn begin(&self) -> Result<Box<dyn CrmTransaction>, StorageError> {
        let tx = self.pool.begin().await.map_err(|e| StorageError::Transaction {
            message: e.to_string(),
        })?;
        Ok(Box::new(PostgresTransaction { tx }))
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StorageError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    async fn list_customers(
        &self,
        filter: &CustomerFilter,
        params: &ListParams,
    ) -> Result<Vec<Customer>, StorageError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.name, c.email, c.phone, c.created_at FROM customers c WHERE TRUE",
        );

        if let Some(name) = &filter.name {
            qb.push(" AND c.name ILIKE ").push_bind(contains_pattern(name));
        }
        if let Some(email) = &filter.email {
            qb.push(" AND c.email ILIKE ").push_bind(contains_pattern(email));
        }
        if let Some(date) = filter.created_at_gte {
            qb.push(" AND c.created_at >= ").push_bind(day_start(date));
        }
        if let Some(date) = filter.created_at_lte {
            qb.push(" AND c.created_at < ").push_bind(day_end_exclusive(date));
        }
        if let Some(prefix) = &filter.phone_pattern {
            qb.push(" AND c.phone LIKE ")
                .push_bind(format!("{}%", like_escape(prefix)));
        }
        push_list_params::<Customer>(&mut qb, "c.", params);

        Ok(qb.build_query_as::<Customer>().fetch_all(&self.pool).await?)
    }

    async fn get_products(&self, ids: &[i64]) -> Result<Vec<Product>, StorageError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        params: &ListParams,
    ) -> Result<Vec<Product>, StorageError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT p.id, p.name, p.price, p.stock FROM products p WHERE TRUE");

        if let Some(name) = &filter.name {
            qb.push(" AND p.name ILIKE ").push_bind(contains_pattern(name));
        }
        if let Some(min) = filter.price_gte {
            qb.push(" AND p.price >= ").push_bind(min);
        }
        if let Some(max) = filter.price_lte {
            qb.push(" AND p.price <= ").push_bind(max);
        }
        if let Some(min) = filter.stock_gte {
            qb.push(" AND p.stock >= ").push_bind(min);
        }
        if let Some(max) = filter.stock_lte {
            qb.push(" AND p.stock <= ").push_bind(max);
        }
        if filter.low_stock == Some(true) {
            qb.push(" AND p.stock < ").push_bind(LOW_STOCK_THRESHOLD);
        }
        push_list_params::<Product>(&mut qb, "p.", params);

        Ok(qb.build_query_as::<Product>().fetch_all(&self.pool).await?)
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        params: &ListParams,
    ) -> Result<Vec<Order>, StorageError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(ORDER_COLUMNS)
            .push(" FROM orders o JOIN customers c ON c.id = o.customer_id WHERE TRUE");

        if let Some(id) = filter.customer_id {
            qb.push(" AND o.customer_id = ").push_bind(id);
        }
        if let Some(min) = filter.total_amount_gte {
            qb.push(" AND o.total_amount >= ").push_bind(min);
        }
        if let Some(max) = filter.total_amount_lte {
            qb.push(" AND o.total_amount <= ").push_bind(max);
        }
        if let Some(date) = filter.order_date_gte {
            qb.push(" AND o.order_date >= ").push_bind(day_start(date));
        }
        if let Some(date) = filter.order_date_lte {
            qb.push(" AND o.order_date < ").push_bind(day_end_exclusive(date));
        }
        if let Some(name) = &filter.customer_name {
            qb.push(" AND c.name ILIKE ").push_bind(contains_pattern(name));
        }
        if let Some(name) = &filter.product_name {
            qb.push(
                " AND EXISTS (SELECT 1 FROM order_products op \
                 JOIN products p ON p.id = op.product_id \
                 WHERE op.order_id = o.id AND p.name ILIKE ",
            )
            .push_bind(contains_pattern(name))
            .push(")");
        }
        if let Some(id) = filter.product_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM order_products op \
                 WHERE op.order_id = o.id AND op.product_id = ",
            )
            .push_bind(id)
            .push(")");
        }
        push_list_params::<Order>(&mut qb, "o.", params);

        Ok(qb.build_query_as::<Order>().fetch_all(&self.pool).await?)
    }
}

/// Write transaction; every insert runs inside its own savepoint
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CrmTransaction for PostgresTransaction {
    async fn email_exists(&mut self, email: &str) -> Result<bool, StorageError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customers WHERE email = $1)")
                .bind(email)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<Customer, StorageError> {
        let mut savepoint = self.tx.begin().await?;
        let inserted = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, email, phone) VALUES ($1, $2, $3) \
             RETURNING id, name, email, phone, created_at",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .fetch_one(&mut *savepoint)
        .await;

        match inserted {
            Ok(customer) => {
                savepoint.commit().await?;
                Ok(customer)
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(map_customer_insert_error(e))
            }
        }
    }

    async fn insert_product(&mut self, product: NewProduct) -> Result<Product, StorageError> {
        let mut savepoint = self.tx.begin().await?;
        let inserted = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price, stock) VALUES ($1, $2, $3) \
             RETURNING id, name, price, stock",
        )
        .bind(&product.name)
        .bind(product.stored_price())
        .bind(product.stock)
        .fetch_one(&mut *savepoint)
        .await;

        match inserted {
            Ok(product) => {
                savepoint.commit().await?;
                Ok(product)
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(e.into())
            }
        }
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, StorageError> {
        let mut savepoint = self.tx.begin().await?;

        let id = match sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (customer_id, total_amount, order_date) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(order.customer_id)
        .bind(order.total_amount)
        .bind(order.order_date)
        .fetch_one(&mut *savepoint)
        .await
        {
            Ok(id) => id,
            Err(e) => {
                savepoint.rollback().await?;
                return Err(e.into());
            }
        };

        let linked = sqlx::query(
            "INSERT INTO order_products (order_id, product_id) \
             SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&order.product_ids)
        .execute(&mut *savepoint)
        .await;

        if let Err(e) = linked {
            savepoint.rollback().await?;
            return Err(e.into());
        }

        savepoint.commit().await?;
        Ok(order.into_order(id))
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        self.tx.commit().await.map_err(|e| StorageError::Transaction {
            message: e.to_string(),
        })
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        self.tx.rollback().await.map_err(|e| StorageError::Transaction {
            message: e.to_string(),
        })
    }
}
