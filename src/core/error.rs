//! Typed error handling for the CRM service
//!
//! Errors are grouped by category so callers can react to a specific case
//! instead of inspecting strings:
//!
//! - [`ValidationError`]: input rejected before anything is persisted
//! - [`StorageError`]: failures reported by a storage backend
//! - [`ConfigError`]: configuration loading and validation failures
//!
//! The `Display` output of every [`ValidationError`] is the exact message
//! returned to GraphQL clients.
//!
//! # Example
//!
//! ```rust,ignore
//! match service.create_product(input).await {
//!     Ok(product) => println!("created {}", product.id),
//!     Err(CrmError::Validation(ValidationError::NonPositivePrice)) => {
//!         println!("price rejected");
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum CrmError {
    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CrmError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrmError::Validation(e) => e.error_code(),
            CrmError::Storage(e) => e.error_code(),
            CrmError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, CrmError::Validation(_))
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Input rejected by a mutation or a list argument
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid phone format")]
    InvalidPhone,

    #[error("Price must be positive")]
    NonPositivePrice,

    #[error("Stock cannot be negative")]
    NegativeStock,

    #[error("At least one product must be selected")]
    NoProductSelected,

    #[error("Invalid customer ID")]
    InvalidCustomerId,

    #[error("Invalid product ID")]
    InvalidProductId,

    /// `orderBy` names a field the entity cannot be sorted by
    #[error("Unknown sort field '{field}'")]
    UnknownSortField { field: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::DuplicateEmail => "EMAIL_ALREADY_EXISTS",
            ValidationError::InvalidPhone => "INVALID_PHONE_FORMAT",
            ValidationError::NonPositivePrice => "PRICE_NOT_POSITIVE",
            ValidationError::NegativeStock => "STOCK_NEGATIVE",
            ValidationError::NoProductSelected => "NO_PRODUCT_SELECTED",
            ValidationError::InvalidCustomerId => "INVALID_CUSTOMER_ID",
            ValidationError::InvalidProductId => "INVALID_PRODUCT_ID",
            ValidationError::UnknownSortField { .. } => "UNKNOWN_SORT_FIELD",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique constraint rejected the write
    #[error("Duplicate value for {entity}.{field}")]
    UniqueViolation {
        entity: &'static str,
        field: &'static str,
    },

    /// Connection or query failure inside a backend
    #[error("{backend} error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    /// Transaction could not be started, committed or rolled back
    #[error("Transaction error: {message}")]
    Transaction { message: String },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::UniqueViolation { .. } => "UNIQUE_VIOLATION",
            StorageError::Backend { .. } => "STORAGE_ERROR",
            StorageError::Transaction { .. } => "TRANSACTION_ERROR",
        }
    }

    /// Whether this is a uniqueness failure on `entity.field`
    pub fn is_unique_violation_on(&self, entity: &str, field: &str) -> bool {
        matches!(
            self,
            StorageError::UniqueViolation { entity: e, field: f } if *e == entity && *f == field
        )
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend {
            backend: "PostgreSQL",
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default())]
    Parse {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}
