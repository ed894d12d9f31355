//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations must make a
//! single logical write atomic: concurrent readers never observe a
//! half-updated policy or override record.

use uuid::Uuid;

use crate::error::GeogateResult;
use crate::models::{
    audit::{AuditEvent, AuditQuery, NewAuditEvent},
    policy::PolicyConfig,
    wfh::{CreateOverride, OverrideDecision, OverrideStatus, WfhOverride},
};

/// Store for the singleton access policy.
pub trait PolicyRepository: Send + Sync {
    /// The currently active policy, or `NotFound` if none has been
    /// installed. The decision engine fails closed on `NotFound`.
    fn get_active(&self) -> impl Future<Output = GeogateResult<PolicyConfig>> + Send;

    /// Atomic whole-record replace. Effective for subsequent decisions
    /// immediately, never retroactively.
    fn replace(
        &self,
        config: PolicyConfig,
    ) -> impl Future<Output = GeogateResult<PolicyConfig>> + Send;

    /// Install the default policy if no record exists yet; returns the
    /// active policy either way.
    fn bootstrap_default(&self) -> impl Future<Output = GeogateResult<PolicyConfig>> + Send;
}

/// Store for per-actor work-from-home overrides. History is retained;
/// a new request supersedes older records rather than merging.
pub trait OverrideRepository: Send + Sync {
    /// The actor's most recent override request, regardless of status.
    fn get_latest(
        &self,
        actor_id: &str,
    ) -> impl Future<Output = GeogateResult<WfhOverride>> + Send;

    /// The actor's most recent `Approved` override, or `NotFound`.
    /// Window applicability is the caller's check.
    fn get_active(
        &self,
        actor_id: &str,
    ) -> impl Future<Output = GeogateResult<WfhOverride>> + Send;

    fn has_pending(&self, actor_id: &str) -> impl Future<Output = GeogateResult<bool>> + Send;

    /// File a new `Pending` request. Callers enforce the
    /// no-duplicate-pending rule via [`Self::has_pending`].
    fn create(
        &self,
        input: CreateOverride,
    ) -> impl Future<Output = GeogateResult<WfhOverride>> + Send;

    /// Apply an admin decision to a request. Only valid from `Pending`;
    /// the transition is terminal.
    fn decide(
        &self,
        id: Uuid,
        decision: OverrideDecision,
    ) -> impl Future<Output = GeogateResult<WfhOverride>> + Send;

    /// All requests, newest first, optionally filtered by status.
    fn list(
        &self,
        status: Option<OverrideStatus>,
    ) -> impl Future<Output = GeogateResult<Vec<WfhOverride>>> + Send;
}

/// Append-only store of decision outcomes and authentication events.
///
/// Appends from concurrent writers must not corrupt each other; each
/// writer stamps its own `(writer_id, sequence)` pair and no total
/// order across writers is guaranteed. Reads are eventually consistent
/// with respect to very recent writes — the staleness bound is one
/// query round-trip, which batch analytics tolerates.
pub trait AuditLogRepository: Send + Sync {
    /// Append one event. Never fails silently: a persistence failure
    /// propagates to the caller and must not be converted into an
    /// allowed outcome upstream.
    fn append(
        &self,
        event: NewAuditEvent,
    ) -> impl Future<Output = GeogateResult<AuditEvent>> + Send;

    /// Events matching the filter, ordered by timestamp ascending
    /// within the queried range.
    fn query(
        &self,
        query: AuditQuery,
    ) -> impl Future<Output = GeogateResult<Vec<AuditEvent>>> + Send;
}
