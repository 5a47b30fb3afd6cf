//! # crm-graphql
//!
//! A GraphQL API over customers, products and orders.
//!
//! ## Features
//!
//! - **Filtered lists**: case-insensitive lookups, numeric and date ranges,
//!   cross-entity filters (orders by customer or product name)
//! - **Validated mutations**: unique emails, phone format, positive prices,
//!   orders priced from their products
//! - **Bulk import**: per-row error collection inside one transaction
//! - **Pluggable storage**: in-memory backend, PostgreSQL behind the
//!   `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crm::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(AppConfig::load()?)
//!     .with_store(InMemoryCrmStore::new())
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BulkCreateOutcome, ConfigError, CrmError, CrmService, CrmStore, CrmTransaction, Data,
        Entity, FieldFormat, FieldValue, ListParams, SortSpec, StorageError, ValidationError,
    };

    // === Entities ===
    pub use crate::entities::{
        Customer, CustomerFilter, NewCustomer, NewOrder, NewProduct, Order, OrderFilter, Product,
        ProductFilter,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCrmStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresCrmStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{GraphQLExposure, RestExposure, ServerBuilder, ServerHost};
    pub use crate::server::exposure::graphql::{CrmSchema, build_schema};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
}
