//! GraphQL API exposure
//!
//! Serves the statically typed CRM schema:
//! - `POST /graphql` executes queries and mutations
//! - `GET /graphql` serves the playground (when enabled)
//! - `GET /graphql/schema` exports the SDL

mod inputs;
mod mutations;
mod schema;
mod types;

pub use inputs::{CustomerFilterInput, CustomerInput, OrderFilterInput, ProductFilterInput};
pub use mutations::{CUSTOMER_CREATED_MESSAGE, MutationRoot};
pub use schema::{CrmSchema, QueryRoot, build_schema};
pub use types::{CustomerNode, OrderNode, ProductNode};

use crate::core::error::CrmError;
use crate::server::host::ServerHost;
use anyhow::Result;
use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql::{Error as GraphQLError, ErrorExtensions};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::sync::Arc;

/// GraphQL API exposure implementation
pub struct GraphQLExposure;

impl GraphQLExposure {
    /// Build the GraphQL router from a host
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let host = Arc::new(builder.build_host()?);
    /// let graphql_app = GraphQLExposure::build_router(host)?;
    /// ```
    pub fn build_router(host: Arc<ServerHost>) -> Result<Router> {
        let playground = host.config.graphql.playground;
        let schema = build_schema(host);

        let mut graphql_route = post(graphql_handler);
        if playground {
            graphql_route = graphql_route.get(graphql_playground);
        }

        let router = Router::new()
            .route("/graphql", graphql_route)
            .route("/graphql/schema", get(graphql_sdl))
            .with_state(schema);

        Ok(router)
    }
}

/// Handler for GraphQL queries and mutations
async fn graphql_handler(State(schema): State<CrmSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// Handler for GraphQL playground UI
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

/// Handler for GraphQL schema SDL export
async fn graphql_sdl(State(schema): State<CrmSchema>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        schema.sdl(),
    )
}

impl ErrorExtensions for CrmError {
    /// Message as the error text, stable code under `extensions.code`
    fn extend(&self) -> GraphQLError {
        if !self.is_client_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }

        let code = self.error_code();
        GraphQLError::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

/// Convert domain results into GraphQL results
pub(crate) trait IntoGraphQLError<T> {
    fn into_graphql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<CrmError>> IntoGraphQLError<T> for std::result::Result<T, E> {
    fn into_graphql(self) -> async_graphql::Result<T> {
        self.map_err(|e| {
            let err: CrmError = e.into();
            err.extend()
        })
    }
}
