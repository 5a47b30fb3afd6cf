//! Plain HTTP routes served next to GraphQL
//!
//! The REST exposure consumes a `ServerHost` and produces an axum `Router`
//! with the health checks and any custom routes registered on the builder.

use super::super::host::ServerHost;
use anyhow::Result;
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

/// Service name reported by the health checks
pub const SERVICE_NAME: &str = "crm-graphql";

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// # Returns
    ///
    /// Returns an axum router with:
    /// - Health check routes (`/health`, `/healthz`)
    /// - Custom routes
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let mut app = Self::health_routes(host);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Build health check routes
    fn health_routes(host: Arc<ServerHost>) -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
            .with_state(host)
    }

    /// Health check endpoint handler
    async fn health_check(State(host): State<Arc<ServerHost>>) -> Json<Value> {
        tracing::trace!(backend = host.backend_name(), "Health check");
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}
