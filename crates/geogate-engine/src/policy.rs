//! Policy administration service.

use geogate_core::error::GeogateResult;
use geogate_core::models::policy::PolicyConfig;
use geogate_core::repository::PolicyRepository;
use tracing::info;

use crate::error::EngineError;

/// Admin-facing policy management. Updates swap the entire record
/// atomically; there are no partial patches.
pub struct PolicyService<P: PolicyRepository> {
    repo: P,
}

impl<P: PolicyRepository> PolicyService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    pub async fn get_policy(&self) -> GeogateResult<PolicyConfig> {
        self.repo.get_active().await
    }

    /// Validate and install a new policy. Effective immediately for
    /// subsequent decisions, never retroactively.
    pub async fn set_policy(&self, config: PolicyConfig) -> GeogateResult<PolicyConfig> {
        if !(-90.0..=90.0).contains(&config.office_latitude) {
            return Err(EngineError::LatitudeOutOfRange(config.office_latitude).into());
        }
        if !(-180.0..=180.0).contains(&config.office_longitude) {
            return Err(EngineError::LongitudeOutOfRange(config.office_longitude).into());
        }
        if config.radius_meters <= 0.0 || !config.radius_meters.is_finite() {
            return Err(EngineError::NonPositiveRadius(config.radius_meters).into());
        }

        info!(
            radius_meters = config.radius_meters,
            allowed_network_id = %config.allowed_network_id,
            "Replacing active access policy"
        );
        self.repo.replace(config).await
    }

    /// Install the default policy at bootstrap if none exists.
    pub async fn bootstrap(&self) -> GeogateResult<PolicyConfig> {
        self.repo.bootstrap_default().await
    }
}
