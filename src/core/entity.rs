//! Entity traits shared by all persisted models

use crate::core::field::FieldValue;

/// Base trait for all persisted entities.
///
/// Every entity has a storage-assigned integer identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Get the unique identifier for this entity instance
    fn id(&self) -> i64;
}

/// Trait for entities that can be listed, sorted and looked up by field.
pub trait Data: Entity {
    /// Fields accepted by `orderBy` for this entity type
    fn sortable_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}
