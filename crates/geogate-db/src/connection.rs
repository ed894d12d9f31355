//! SurrealDB connection management.
//!
//! Connection settings come from `GEOGATE_DB_*` environment variables
//! so deployments never ship hardcoded credentials; the defaults only
//! suit a local development instance.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings for the SurrealDB backend.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address (e.g., `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl DbConfig {
    /// Read settings from the process environment: `GEOGATE_DB_URL`,
    /// `GEOGATE_DB_NAMESPACE`, `GEOGATE_DB_DATABASE`,
    /// `GEOGATE_DB_USERNAME`, and `GEOGATE_DB_PASSWORD`. Unset
    /// variables fall back to local-development defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let setting = |key: &str, default: &str| get(key).unwrap_or_else(|| default.into());
        Self {
            url: setting("GEOGATE_DB_URL", "127.0.0.1:8000"),
            namespace: setting("GEOGATE_DB_NAMESPACE", "geogate"),
            database: setting("GEOGATE_DB_DATABASE", "main"),
            username: setting("GEOGATE_DB_USERNAME", "root"),
            password: setting("GEOGATE_DB_PASSWORD", "root"),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, authenticate, and select the configured namespace and
    /// database. Each step failure carries enough context to tell a
    /// wrong address from rejected credentials.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await.map_err(|e| {
            DbError::Connection(format!("cannot reach SurrealDB at {}: {e}", config.url))
        })?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await
        .map_err(|e| {
            DbError::Connection(format!("signin as '{}' rejected: {e}", config.username))
        })?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                DbError::Connection(format!(
                    "cannot select {}/{}: {e}",
                    config.namespace, config.database
                ))
            })?;

        info!("SurrealDB connection established");

        Ok(Self { db })
    }

    /// Access the underlying database handle.
    pub fn db(&self) -> &Surreal<Client> {
        &self.db
    }
}
