//! Work-from-home override workflow service.

use geogate_core::error::{GeogateError, GeogateResult};
use geogate_core::models::wfh::{CreateOverride, OverrideDecision, OverrideStatus, WfhOverride};
use geogate_core::repository::OverrideRepository;
use tracing::info;

use crate::error::EngineError;

/// Override request/decision workflow.
///
/// An actor files a request (`Pending`); an administrator transitions
/// it once to `Approved` or `Rejected`. The transition is terminal — a
/// new request must be filed to reopen, and it supersedes the old
/// record rather than merging with it.
pub struct OverrideService<O: OverrideRepository> {
    repo: O,
}

impl<O: OverrideRepository> OverrideService<O> {
    pub fn new(repo: O) -> Self {
        Self { repo }
    }

    /// File a new override request. Fails if the actor already has a
    /// pending one.
    pub async fn request(&self, actor_id: &str, reason: &str) -> GeogateResult<WfhOverride> {
        if self.repo.has_pending(actor_id).await? {
            return Err(EngineError::DuplicatePendingRequest.into());
        }

        info!(actor_id = %actor_id, "Work-from-home override requested");
        self.repo
            .create(CreateOverride {
                actor_id: actor_id.into(),
                reason: reason.into(),
            })
            .await
    }

    /// Apply an admin decision to the actor's pending request.
    pub async fn decide(
        &self,
        actor_id: &str,
        decision: OverrideDecision,
    ) -> GeogateResult<WfhOverride> {
        if decision.status == OverrideStatus::Pending {
            return Err(EngineError::InvalidDecisionStatus.into());
        }
        if let (Some(start), Some(end)) = (decision.window_start, decision.window_end)
            && end <= start
        {
            return Err(EngineError::InvalidWindow.into());
        }

        let latest = self.repo.get_latest(actor_id).await?;
        if latest.status != OverrideStatus::Pending {
            return Err(GeogateError::InvalidTransition {
                entity: "wfh_override".into(),
                from: latest.status.as_str().into(),
                to: decision.status.as_str().into(),
            });
        }

        info!(
            actor_id = %actor_id,
            status = decision.status.as_str(),
            decided_by = %decision.decided_by,
            "Work-from-home override decided"
        );
        self.repo.decide(latest.id, decision).await
    }

    /// The actor's most recent request, regardless of status.
    pub async fn status(&self, actor_id: &str) -> GeogateResult<WfhOverride> {
        self.repo.get_latest(actor_id).await
    }

    /// Admin view of requests, newest first.
    pub async fn list_requests(
        &self,
        status: Option<OverrideStatus>,
    ) -> GeogateResult<Vec<WfhOverride>> {
        self.repo.list(status).await
    }
}
