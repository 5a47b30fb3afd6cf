//! Field value types and format validation

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// A polymorphic field value used for generic sorting and lookups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Total order used when sorting entities by a field.
    ///
    /// Null sorts before every other value. Values of different variants
    /// compare equal, which never happens for a single entity field.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Decimal(a), FieldValue::Decimal(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Field format validators
#[derive(Debug, Clone, Copy)]
pub enum FieldFormat {
    /// International (`+` and 10 to 15 digits) or dashed `123-456-7890`
    Phone,
}

impl FieldFormat {
    /// Check a string against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Phone => Self::is_valid_phone(value),
        }
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX.get_or_init(|| {
            Regex::new(r"^(\+\d{10,15}|\d{3}-\d{3}-\d{4})$").expect("phone pattern is valid")
        });
        regex.is_match(phone)
    }
}
