//! Input validation
//!
//! Validators run before anything reaches a storage backend. Checks that
//! need a lookup (email uniqueness, id resolution) live in the service.

pub mod validators;
