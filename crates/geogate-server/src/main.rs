//! GeoGate Server — Application entry point.
//!
//! Wires the decision engine, admin services, and risk analyzer over a
//! shared SurrealDB connection. The transport surface (HTTP/RPC) is an
//! integration detail layered on top of these services.

use geogate_analytics::RiskAnalyzer;
use geogate_db::{DbConfig, DbManager};
use geogate_db::repository::{
    SurrealAuditLogRepository, SurrealOverrideRepository, SurrealPolicyRepository,
};
use geogate_engine::{DecisionEngine, PolicyService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("geogate=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting GeoGate server...");

    let db_config = DbConfig::from_env();
    let manager = match DbManager::connect(&db_config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = geogate_db::run_migrations(manager.db()).await {
        tracing::error!(error = %e, "Schema migration failed");
        std::process::exit(1);
    }

    // Install the default policy on first boot; the decision engine
    // fails closed without one.
    let policy_service = PolicyService::new(SurrealPolicyRepository::new(manager.db().clone()));
    if let Err(e) = policy_service.bootstrap().await {
        tracing::error!(error = %e, "Policy bootstrap failed");
        std::process::exit(1);
    }

    let _engine = DecisionEngine::new(
        SurrealPolicyRepository::new(manager.db().clone()),
        SurrealOverrideRepository::new(manager.db().clone()),
        SurrealAuditLogRepository::new(manager.db().clone()),
    );
    let _analyzer = RiskAnalyzer::new(SurrealAuditLogRepository::new(manager.db().clone()));

    // TODO: expose the engine and analyzer over the API transport once
    // the gateway crate lands.

    tracing::info!("GeoGate server stopped.");
}
