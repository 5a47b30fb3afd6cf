//! Customer model and filter set

use crate::core::entity::{Data, Entity};
use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use crate::core::query::{day_end_exclusive, day_start, icontains};
use crate::core::validation::validators;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted customer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Customer {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Data for Customer {
    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "email", "created_at"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "name" => Some(FieldValue::String(self.name.clone())),
            "email" => Some(FieldValue::String(self.email.clone())),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }
}

/// Input for creating a customer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: Option<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone,
        }
    }

    /// Field checks that need no storage lookup
    pub fn validate(&self) -> Result<(), ValidationError> {
        validators::phone(self.phone.as_deref())
    }

    /// Materialize the row a backend stores
    pub fn into_customer(self, id: i64, created_at: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            created_at,
        }
    }
}

/// Lookups accepted by the `customers` list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the email
    pub email: Option<String>,
    pub created_at_gte: Option<NaiveDate>,
    pub created_at_lte: Option<NaiveDate>,
    /// Phone prefix, e.g. `+1` or `+251`
    pub phone_pattern: Option<String>,
}

impl CustomerFilter {
    /// Evaluate the filter against a customer
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(name) = &self.name {
            if !icontains(&customer.name, name) {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !icontains(&customer.email, email) {
                return false;
            }
        }
        if let Some(date) = self.created_at_gte {
            if customer.created_at < day_start(date) {
                return false;
            }
        }
        if let Some(date) = self.created_at_lte {
            if customer.created_at >= day_end_exclusive(date) {
                return false;
            }
        }
        if let Some(prefix) = &self.phone_pattern {
            match &customer.phone {
                Some(phone) if phone.starts_with(prefix.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}
