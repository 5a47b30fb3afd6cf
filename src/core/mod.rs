//! Core module containing the domain traits, errors and services of the CRM

pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use entity::{Data, Entity};
pub use error::{ConfigError, CrmError, StorageError, ValidationError};
pub use field::{FieldFormat, FieldValue};
pub use query::{DEFAULT_MAX_PAGE_SIZE, ListParams, SortSpec};
pub use service::{BulkCreateOutcome, CrmService};
pub use store::{CrmStore, CrmTransaction};
