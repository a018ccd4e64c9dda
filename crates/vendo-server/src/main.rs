//! Vendo Server — application entry point.

use std::env;

use tracing_subscriber::EnvFilter;
use vendo_db::{DbConfig, DbManager};

/// Database settings, overridable from the environment.
fn db_config_from_env() -> DbConfig {
    let mut config = DbConfig::default();
    if let Ok(url) = env::var("VENDO_DB_URL") {
        config.url = url;
    }
    if let Ok(namespace) = env::var("VENDO_DB_NAMESPACE") {
        config.namespace = namespace;
    }
    if let Ok(database) = env::var("VENDO_DB_DATABASE") {
        config.database = database;
    }
    if let Ok(username) = env::var("VENDO_DB_USERNAME") {
        config.username = username;
    }
    if let Ok(password) = env::var("VENDO_DB_PASSWORD") {
        config.password = password;
    }
    config
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vendo=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting Vendo server...");

    let config = db_config_from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            return;
        }
    };

    if let Err(e) = vendo_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Schema migration failed");
        return;
    }

    tracing::info!("Schema up to date; repositories ready");

    // TODO: attach the HTTP transport; each endpoint maps 1:1 onto a
    // vendo-service operation.

    tracing::info!("Vendo server stopped.");
}
