//! Engine error types.

use geogate_core::error::GeogateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("latitude and longitude must be supplied together")]
    PartialCoordinates,

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("a pending override request already exists for this actor")]
    DuplicatePendingRequest,

    #[error("override decision must be Approved or Rejected")]
    InvalidDecisionStatus,

    #[error("override window end must be after its start")]
    InvalidWindow,
}

impl From<EngineError> for GeogateError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::DuplicatePendingRequest => GeogateError::AlreadyExists {
                entity: "pending wfh_override".into(),
            },
            other => GeogateError::Validation {
                message: other.to_string(),
            },
        }
    }
}
