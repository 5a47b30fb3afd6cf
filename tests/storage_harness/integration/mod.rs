//! Integration test infrastructure for storage backends.
//!
//! Runs a backend behind the real GraphQL schema and router:
//!
//! ```text
//! graphql_integration_tests!  Schema::execute ─┐
//! http_integration_tests!     axum_test::TestServer ─ Router
//!                                              └─ ServerHost → CrmService → CrmStore
//! ```



use async_graphql::{Request, Variables};
use crm::config::AppConfig;
use crm::core::CrmStore;
use crm::server::ServerHost;
use crm::server::exposure::graphql::{CrmSchema, build_schema};
use serde_json::Value;
use std::sync::Arc;

/// Build a schema over `store` with the given page size cap
pub fn schema_for(store: impl CrmStore + 'static, max_page_size: usize) -> CrmSchema {
    let mut config = AppConfig::default();
    config.server.max_page_size = max_page_size;
    build_schema(Arc::new(ServerHost::new(config, Arc::new(store))))
}

/// Outcome of one GraphQL execution, flattened to JSON
#[derive(Debug)]
pub struct GqlResult {
    pub data: Value,
    /// `(message, extensions.code)` per error
    pub errors: Vec<(String, Option<String>)>,
}

impl GqlResult {
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|(m, _)| m.as_str()).collect()
    }

    pub fn assert_ok(&self) {
        assert!(self.errors.is_empty(), "unexpected errors: {:?}", self.errors);
    }
}

/// Execute a document with optional JSON variables
pub async fn execute(schema: &CrmSchema, query: &str, variables: Option<Value>) -> GqlResult {
    let mut request = Request::new(query);
    if let Some(vars) = variables {
        request = request.variables(Variables::from_json(vars));
    }

    let response = schema.execute(request).await;
    let errors = response
        .errors
        .iter()
        .map(|e| {
            let json = serde_json::to_value(e).unwrap_or(Value::Null);
            let code = json["extensions"]["code"].as_str().map(String::from);
            (e.message.clone(), code)
        })
        .collect();

    GqlResult {
        data: response.data.into_json().unwrap_or(Value::Null),
        errors,
    }
}

/// Parse a GraphQL `Decimal` output (serialized as a string)
pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .expect("valid decimal")
}
