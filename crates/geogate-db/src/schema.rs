//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. The audit table denies update
//! and delete at the permission level so events stay immutable.
//!
//! Applied migrations are tracked in `schema_migration`; each version
//! is applied at most once, in ascending order.

use std::collections::BTreeSet;

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS schema_migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE schema_migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE schema_migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE schema_migration \
    TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_schema_migration_version \
    ON TABLE schema_migration COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedVersion {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    ddl: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    ddl: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Access Policy (singleton, admin-owned)
-- =======================================================================
DEFINE TABLE access_policy SCHEMAFULL;
DEFINE FIELD office_latitude ON TABLE access_policy TYPE float;
DEFINE FIELD office_longitude ON TABLE access_policy TYPE float;
DEFINE FIELD radius_meters ON TABLE access_policy TYPE float \
    ASSERT $value > 0;
DEFINE FIELD allowed_network_id ON TABLE access_policy TYPE string;
DEFINE FIELD work_start ON TABLE access_policy TYPE string;
DEFINE FIELD work_end ON TABLE access_policy TYPE string;
DEFINE FIELD updated_at ON TABLE access_policy TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- WFH Overrides (per-actor, history retained)
-- =======================================================================
DEFINE TABLE wfh_override SCHEMAFULL;
DEFINE FIELD actor_id ON TABLE wfh_override TYPE string;
DEFINE FIELD status ON TABLE wfh_override TYPE string \
    ASSERT $value IN ['Pending', 'Approved', 'Rejected'];
DEFINE FIELD reason ON TABLE wfh_override TYPE string;
DEFINE FIELD window_start ON TABLE wfh_override TYPE option<datetime>;
DEFINE FIELD window_end ON TABLE wfh_override TYPE option<datetime>;
DEFINE FIELD decided_by ON TABLE wfh_override TYPE option<string>;
DEFINE FIELD comment ON TABLE wfh_override TYPE option<string>;
DEFINE FIELD requested_at ON TABLE wfh_override TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD decided_at ON TABLE wfh_override TYPE option<datetime>;
DEFINE INDEX idx_override_actor_requested ON TABLE wfh_override \
    COLUMNS actor_id, requested_at;
DEFINE INDEX idx_override_actor_status ON TABLE wfh_override \
    COLUMNS actor_id, status;

-- =======================================================================
-- Audit Events (append-only)
-- =======================================================================
DEFINE TABLE audit_event SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD writer_id ON TABLE audit_event TYPE string;
DEFINE FIELD sequence ON TABLE audit_event TYPE int;
DEFINE FIELD actor_id ON TABLE audit_event TYPE string;
DEFINE FIELD resource_id ON TABLE audit_event TYPE option<string>;
DEFINE FIELD category ON TABLE audit_event TYPE string \
    ASSERT $value IN ['ResourceAccess', 'Authentication'];
DEFINE FIELD action ON TABLE audit_event TYPE string;
DEFINE FIELD outcome ON TABLE audit_event TYPE string \
    ASSERT $value IN ['Success', 'Failure'];
DEFINE FIELD reason ON TABLE audit_event TYPE option<string>;
DEFINE FIELD latitude ON TABLE audit_event TYPE option<float>;
DEFINE FIELD longitude ON TABLE audit_event TYPE option<float>;
DEFINE FIELD network_id ON TABLE audit_event TYPE option<string>;
DEFINE FIELD timestamp ON TABLE audit_event TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_actor_time ON TABLE audit_event \
    COLUMNS actor_id, timestamp;
DEFINE INDEX idx_audit_category_time ON TABLE audit_event \
    COLUMNS category, timestamp;
DEFINE INDEX idx_audit_writer_sequence ON TABLE audit_event \
    COLUMNS writer_id, sequence UNIQUE;
";

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Apply any schema migrations not yet recorded in `schema_migration`.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("schema_migration table setup failed: {e}")))?;

    let mut result = db.query("SELECT version FROM schema_migration").await?;
    let recorded: Vec<AppliedVersion> = result.take(0)?;
    let applied: BTreeSet<u32> = recorded.into_iter().map(|m| m.version).collect();

    for migration in MIGRATIONS.iter().filter(|m| !applied.contains(&m.version)) {
        apply(db, migration).await?;
    }

    Ok(())
}

async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    info!(
        version = migration.version,
        name = migration.name,
        "Applying migration"
    );

    db.query(migration.ddl).await?.check().map_err(|e| {
        DbError::Migration(format!(
            "migration v{} '{}' failed: {e}",
            migration.version, migration.name,
        ))
    })?;

    db.query("CREATE schema_migration SET version = $version, name = $name")
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "recording migration v{} failed: {e}",
                migration.version,
            ))
        })?;

    info!(version = migration.version, "Migration applied successfully");
    Ok(())
}
