//! `crm-server`: serves the CRM GraphQL API

use anyhow::{Context, Result};
use crm::config::AppConfig;
use crm::core::CrmStore;
use crm::server::ServerBuilder;
use crm::storage::InMemoryCrmStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = build_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "Storage ready");

    let addr = config.server.bind_addr.clone();
    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .serve(&addr)
        .await
}

#[cfg(feature = "postgres")]
async fn build_store(config: &AppConfig) -> Result<Arc<dyn CrmStore>> {
    use crm::storage::PostgresCrmStore;

    match &config.database.url {
        Some(url) => {
            let store = PostgresCrmStore::connect(url, config.database.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            store.migrate().await.context("Failed to run migrations")?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryCrmStore::new())),
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_store(config: &AppConfig) -> Result<Arc<dyn CrmStore>> {
    if config.database.url.is_some() {
        tracing::warn!("database.url is set but the `postgres` feature is disabled; using in-memory storage");
    }
    Ok(Arc::new(InMemoryCrmStore::new()))
}
