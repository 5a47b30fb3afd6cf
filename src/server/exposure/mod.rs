//! API Exposure modules
//!
//! Each exposure consumes a `ServerHost` and produces an axum `Router`.

pub mod graphql;
pub mod rest;

pub use graphql::GraphQLExposure;
pub use rest::RestExposure;
