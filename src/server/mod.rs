//! Server module for building the HTTP server
//!
//! `ServerBuilder` assembles a `ServerHost` from the configuration and a
//! storage backend, then mounts every exposure on one axum `Router`:
//! - GraphQL endpoint, playground and SDL export
//! - Health checks
//! - Custom routes

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::{GraphQLExposure, RestExposure};
pub use host::ServerHost;
