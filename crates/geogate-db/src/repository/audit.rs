//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! Each repository instance is one log writer: it owns a `writer_id`
//! and a monotonic sequence counter, and stamps both onto every
//! appended event. Concurrent writers interleave freely; queries order
//! by wall-clock timestamp instead of any cross-writer sequence.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use geogate_core::error::GeogateResult;
use geogate_core::models::audit::{
    AuditCategory, AuditEvent, AuditOutcome, AuditQuery, NewAuditEvent,
};
use geogate_core::repository::AuditLogRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    writer_id: String,
    sequence: u64,
    actor_id: String,
    resource_id: Option<String>,
    category: String,
    action: String,
    outcome: String,
    reason: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    network_id: Option<String>,
    timestamp: DateTime<Utc>,
}

/// Row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    writer_id: String,
    sequence: u64,
    actor_id: String,
    resource_id: Option<String>,
    category: String,
    action: String,
    outcome: String,
    reason: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    network_id: Option<String>,
    timestamp: DateTime<Utc>,
}

fn parse_category(raw: &str) -> Result<AuditCategory, DbError> {
    match raw {
        "ResourceAccess" => Ok(AuditCategory::ResourceAccess),
        "Authentication" => Ok(AuditCategory::Authentication),
        other => Err(DbError::Corrupt(format!("invalid audit category: {other}"))),
    }
}

fn parse_outcome(raw: &str) -> Result<AuditOutcome, DbError> {
    match raw {
        "Success" => Ok(AuditOutcome::Success),
        "Failure" => Ok(AuditOutcome::Failure),
        other => Err(DbError::Corrupt(format!("invalid audit outcome: {other}"))),
    }
}

fn row_to_event(row: AuditRow, id: Uuid) -> Result<AuditEvent, DbError> {
    let writer_id = Uuid::parse_str(&row.writer_id)
        .map_err(|e| DbError::Corrupt(format!("invalid writer UUID: {e}")))?;
    Ok(AuditEvent {
        id,
        writer_id,
        sequence: row.sequence,
        actor_id: row.actor_id,
        resource_id: row.resource_id,
        category: parse_category(&row.category)?,
        action: row.action,
        outcome: parse_outcome(&row.outcome)?,
        reason: row.reason,
        latitude: row.latitude,
        longitude: row.longitude,
        network_id: row.network_id,
        timestamp: row.timestamp,
    })
}

impl AuditRowWithId {
    fn try_into_event(self) -> Result<AuditEvent, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        let row = AuditRow {
            writer_id: self.writer_id,
            sequence: self.sequence,
            actor_id: self.actor_id,
            resource_id: self.resource_id,
            category: self.category,
            action: self.action,
            outcome: self.outcome,
            reason: self.reason,
            latitude: self.latitude,
            longitude: self.longitude,
            network_id: self.network_id,
            timestamp: self.timestamp,
        };
        row_to_event(row, id)
    }
}

/// SurrealDB implementation of the audit log repository.
///
/// Cloning shares the writer identity and sequence counter, keeping
/// per-writer monotonicity across clones.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
    writer_id: Uuid,
    sequence: Arc<AtomicU64>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            writer_id: Uuid::new_v4(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn writer_id(&self) -> Uuid {
        self.writer_id
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, event: NewAuditEvent) -> GeogateResult<AuditEvent> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);

        let result = self
            .db
            .query(
                "CREATE type::record('audit_event', $id) SET \
                 writer_id = $writer_id, \
                 sequence = $sequence, \
                 actor_id = $actor_id, \
                 resource_id = $resource_id, \
                 category = $category, \
                 action = $action, \
                 outcome = $outcome, \
                 reason = $reason, \
                 latitude = $latitude, \
                 longitude = $longitude, \
                 network_id = $network_id, \
                 timestamp = $timestamp",
            )
            .bind(("id", id_str.clone()))
            .bind(("writer_id", self.writer_id.to_string()))
            .bind(("sequence", sequence))
            .bind(("actor_id", event.actor_id))
            .bind(("resource_id", event.resource_id))
            .bind(("category", event.category.as_str()))
            .bind(("action", event.action))
            .bind(("outcome", event.outcome.as_str()))
            .bind(("reason", event.reason))
            .bind(("latitude", event.latitude))
            .bind(("longitude", event.longitude))
            .bind(("network_id", event.network_id))
            .bind(("timestamp", event.timestamp))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_event".into(),
            id: id_str,
        })?;

        row_to_event(row, id).map_err(Into::into)
    }

    async fn query(&self, query: AuditQuery) -> GeogateResult<Vec<AuditEvent>> {
        let mut clauses: Vec<&str> = Vec::new();
        if query.actor_id.is_some() {
            clauses.push("actor_id = $actor_id");
        }
        if query.category.is_some() {
            clauses.push("category = $category");
        }
        if query.outcome.is_some() {
            clauses.push("outcome = $outcome");
        }
        if query.range.is_some() {
            clauses.push("timestamp >= $range_start AND timestamp <= $range_end");
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let limit_clause = match query.limit {
            Some(_) => " LIMIT $limit",
            None => "",
        };

        let mut db_query = self.db.query(format!(
            "SELECT meta::id(id) AS record_id, * FROM audit_event{where_clause} \
             ORDER BY timestamp ASC{limit_clause}"
        ));

        if let Some(actor_id) = query.actor_id {
            db_query = db_query.bind(("actor_id", actor_id));
        }
        if let Some(category) = query.category {
            db_query = db_query.bind(("category", category.as_str()));
        }
        if let Some(outcome) = query.outcome {
            db_query = db_query.bind(("outcome", outcome.as_str()));
        }
        if let Some(range) = query.range {
            db_query = db_query
                .bind(("range_start", range.start))
                .bind(("range_end", range.end));
        }
        if let Some(limit) = query.limit {
            db_query = db_query.bind(("limit", limit));
        }

        let mut result = db_query.await.map_err(DbError::from)?;
        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_event().map_err(Into::into))
            .collect()
    }
}
