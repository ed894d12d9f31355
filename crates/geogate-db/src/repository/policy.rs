//! SurrealDB implementation of [`PolicyRepository`].
//!
//! The policy is a singleton stored under the fixed record id
//! `access_policy:active`. Replacement is a single UPSERT, so readers
//! always observe either the old or the new record, never a mix.

use chrono::{DateTime, NaiveTime, Utc};
use geogate_core::error::GeogateResult;
use geogate_core::models::policy::PolicyConfig;
use geogate_core::repository::PolicyRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

/// Fixed record id for the singleton policy.
const ACTIVE_POLICY_ID: &str = "active";

/// Working-hours bounds are stored as `HH:MM:SS` strings so
/// sub-minute bounds survive the round trip.
const WORK_TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, SurrealValue)]
struct PolicyRow {
    office_latitude: f64,
    office_longitude: f64,
    radius_meters: f64,
    allowed_network_id: String,
    work_start: String,
    work_end: String,
    updated_at: DateTime<Utc>,
}

impl PolicyRow {
    fn try_into_config(self) -> Result<PolicyConfig, DbError> {
        let work_start = NaiveTime::parse_from_str(&self.work_start, WORK_TIME_FORMAT)
            .map_err(|e| DbError::Corrupt(format!("invalid work_start: {e}")))?;
        let work_end = NaiveTime::parse_from_str(&self.work_end, WORK_TIME_FORMAT)
            .map_err(|e| DbError::Corrupt(format!("invalid work_end: {e}")))?;
        Ok(PolicyConfig {
            office_latitude: self.office_latitude,
            office_longitude: self.office_longitude,
            radius_meters: self.radius_meters,
            allowed_network_id: self.allowed_network_id,
            work_start,
            work_end,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Policy repository.
#[derive(Clone)]
pub struct SurrealPolicyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPolicyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PolicyRepository for SurrealPolicyRepository<C> {
    async fn get_active(&self) -> GeogateResult<PolicyConfig> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('access_policy', $id)")
            .bind(("id", ACTIVE_POLICY_ID))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PolicyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "access_policy".into(),
            id: ACTIVE_POLICY_ID.into(),
        })?;

        row.try_into_config().map_err(Into::into)
    }

    async fn replace(&self, config: PolicyConfig) -> GeogateResult<PolicyConfig> {
        let result = self
            .db
            .query(
                "UPSERT type::record('access_policy', $id) SET \
                 office_latitude = $office_latitude, \
                 office_longitude = $office_longitude, \
                 radius_meters = $radius_meters, \
                 allowed_network_id = $allowed_network_id, \
                 work_start = $work_start, \
                 work_end = $work_end, \
                 updated_at = time::now()",
            )
            .bind(("id", ACTIVE_POLICY_ID))
            .bind(("office_latitude", config.office_latitude))
            .bind(("office_longitude", config.office_longitude))
            .bind(("radius_meters", config.radius_meters))
            .bind(("allowed_network_id", config.allowed_network_id))
            .bind((
                "work_start",
                config.work_start.format(WORK_TIME_FORMAT).to_string(),
            ))
            .bind((
                "work_end",
                config.work_end.format(WORK_TIME_FORMAT).to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<PolicyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "access_policy".into(),
            id: ACTIVE_POLICY_ID.into(),
        })?;

        row.try_into_config().map_err(Into::into)
    }

    async fn bootstrap_default(&self) -> GeogateResult<PolicyConfig> {
        match self.get_active().await {
            Ok(policy) => Ok(policy),
            Err(geogate_core::GeogateError::NotFound { .. }) => {
                info!("No active access policy found, installing defaults");
                self.replace(PolicyConfig::bootstrap_default()).await
            }
            Err(e) => Err(e),
        }
    }
}
