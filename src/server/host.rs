//! Server host for transport-agnostic API exposure
//!
//! `ServerHost` holds all state needed to expose the CRM over HTTP: the
//! configuration, the storage backend and the service built on top of it.
//! Exposures (GraphQL, REST) consume an `Arc<ServerHost>` and never reach
//! into each other.

use crate::config::AppConfig;
use crate::core::error::ValidationError;
use crate::core::query::ListParams;
use crate::core::service::CrmService;
use crate::core::store::CrmStore;
use crate::core::Data;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ServerHost::new(config, store));
/// let graphql_app = GraphQLExposure::build_router(host.clone())?;
/// let rest_app = RestExposure::build_router(host, vec![])?;
/// ```
pub struct ServerHost {
    pub config: Arc<AppConfig>,

    /// Storage backend shared by every exposure
    pub store: Arc<dyn CrmStore>,

    pub service: CrmService,
}

impl ServerHost {
    pub fn new(config: AppConfig, store: Arc<dyn CrmStore>) -> Self {
        let service = CrmService::new(store.clone());
        Self {
            config: Arc::new(config),
            store,
            service,
        }
    }

    /// Build list parameters for `T`, clamped by the configured page size
    pub fn list_params<T: Data>(
        &self,
        order_by: Option<&str>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<ListParams, ValidationError> {
        ListParams::for_entity::<T>(order_by, limit, offset, self.config.server.max_page_size)
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
