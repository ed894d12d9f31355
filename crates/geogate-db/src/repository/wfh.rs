//! SurrealDB implementation of [`OverrideRepository`].

use chrono::{DateTime, Utc};
use geogate_core::error::{GeogateError, GeogateResult};
use geogate_core::models::wfh::{CreateOverride, OverrideDecision, OverrideStatus, WfhOverride};
use geogate_core::repository::OverrideRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OverrideRow {
    actor_id: String,
    status: String,
    reason: String,
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    decided_by: Option<String>,
    comment: Option<String>,
    requested_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

/// Row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OverrideRowWithId {
    record_id: String,
    actor_id: String,
    status: String,
    reason: String,
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    decided_by: Option<String>,
    comment: Option<String>,
    requested_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

fn parse_status(raw: &str) -> Result<OverrideStatus, DbError> {
    match raw {
        "Pending" => Ok(OverrideStatus::Pending),
        "Approved" => Ok(OverrideStatus::Approved),
        "Rejected" => Ok(OverrideStatus::Rejected),
        other => Err(DbError::Corrupt(format!("invalid override status: {other}"))),
    }
}

fn row_to_override(row: OverrideRow, id: Uuid) -> Result<WfhOverride, DbError> {
    Ok(WfhOverride {
        id,
        actor_id: row.actor_id,
        status: parse_status(&row.status)?,
        reason: row.reason,
        window_start: row.window_start,
        window_end: row.window_end,
        decided_by: row.decided_by,
        comment: row.comment,
        requested_at: row.requested_at,
        decided_at: row.decided_at,
    })
}

impl OverrideRowWithId {
    fn try_into_override(self) -> Result<WfhOverride, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(WfhOverride {
            id,
            actor_id: self.actor_id,
            status: parse_status(&self.status)?,
            reason: self.reason,
            window_start: self.window_start,
            window_end: self.window_end,
            decided_by: self.decided_by,
            comment: self.comment,
            requested_at: self.requested_at,
            decided_at: self.decided_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Override repository.
#[derive(Clone)]
pub struct SurrealOverrideRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOverrideRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn latest_where(&self, actor_id: String, clause: &str) -> GeogateResult<WfhOverride> {
        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM wfh_override \
                 WHERE actor_id = $actor_id{clause} \
                 ORDER BY requested_at DESC LIMIT 1"
            ))
            .bind(("actor_id", actor_id.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "wfh_override".into(),
            id: format!("actor_id={actor_id}"),
        })?;

        row.try_into_override().map_err(Into::into)
    }
}

impl<C: Connection> OverrideRepository for SurrealOverrideRepository<C> {
    async fn get_latest(&self, actor_id: &str) -> GeogateResult<WfhOverride> {
        self.latest_where(actor_id.to_string(), "").await
    }

    async fn get_active(&self, actor_id: &str) -> GeogateResult<WfhOverride> {
        self.latest_where(actor_id.to_string(), " AND status = 'Approved'")
            .await
    }

    async fn has_pending(&self, actor_id: &str) -> GeogateResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM wfh_override \
                 WHERE actor_id = $actor_id AND status = 'Pending' \
                 GROUP ALL",
            )
            .bind(("actor_id", actor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn create(&self, input: CreateOverride) -> GeogateResult<WfhOverride> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('wfh_override', $id) SET \
                 actor_id = $actor_id, \
                 status = 'Pending', \
                 reason = $reason, \
                 window_start = NONE, \
                 window_end = NONE, \
                 decided_by = NONE, \
                 comment = NONE, \
                 decided_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("actor_id", input.actor_id))
            .bind(("reason", input.reason))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "wfh_override".into(),
            id: id_str,
        })?;

        row_to_override(row, id).map_err(Into::into)
    }

    async fn decide(&self, id: Uuid, decision: OverrideDecision) -> GeogateResult<WfhOverride> {
        let id_str = id.to_string();

        // Read first so an already-decided request surfaces as an
        // invalid transition rather than a silent no-op.
        let mut result = self
            .db
            .query("SELECT * FROM type::record('wfh_override', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "wfh_override".into(),
            id: id_str.clone(),
        })?;
        let current = parse_status(&row.status).map_err(DbError::from)?;

        if current != OverrideStatus::Pending {
            return Err(GeogateError::InvalidTransition {
                entity: "wfh_override".into(),
                from: current.as_str().into(),
                to: decision.status.as_str().into(),
            });
        }

        let mut result = self
            .db
            .query(
                "UPDATE type::record('wfh_override', $id) SET \
                 status = $status, \
                 window_start = $window_start, \
                 window_end = $window_end, \
                 decided_by = $decided_by, \
                 comment = $comment, \
                 decided_at = time::now() \
                 WHERE status = 'Pending'",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", decision.status.as_str()))
            .bind(("window_start", decision.window_start))
            .bind(("window_end", decision.window_end))
            .bind(("decided_by", decision.decided_by))
            .bind(("comment", decision.comment))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "wfh_override".into(),
            id: id_str,
        })?;

        row_to_override(row, id).map_err(Into::into)
    }

    async fn list(&self, status: Option<OverrideStatus>) -> GeogateResult<Vec<WfhOverride>> {
        let clause = match status {
            Some(_) => " WHERE status = $status",
            None => "",
        };

        let mut query = self.db.query(format!(
            "SELECT meta::id(id) AS record_id, * FROM wfh_override{clause} \
             ORDER BY requested_at DESC"
        ));
        if let Some(status) = status {
            query = query.bind(("status", status.as_str()));
        }

        let mut result = query.await.map_err(DbError::from)?;
        let rows: Vec<OverrideRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_override().map_err(Into::into))
            .collect()
    }
}
