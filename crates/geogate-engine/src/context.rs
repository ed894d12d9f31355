//! Access context validation.
//!
//! Malformed input (out-of-range coordinates) is a validation error
//! rejected before the decision engine runs — it is surfaced to the
//! caller and never recorded as a policy failure. A merely *absent*
//! optional field is not malformed; the engine treats absence as a
//! failed check instead.

use geogate_core::models::decision::AccessContext;

use crate::error::EngineError;

/// Reject structurally invalid contexts.
pub fn validate(ctx: &AccessContext) -> Result<(), EngineError> {
    match (ctx.latitude, ctx.longitude) {
        (None, None) => {}
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(EngineError::LatitudeOutOfRange(lat));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(EngineError::LongitudeOutOfRange(lon));
            }
        }
        _ => return Err(EngineError::PartialCoordinates),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_at(lat: f64, lon: f64) -> AccessContext {
        let mut ctx = AccessContext::new("alice", "doc-1");
        ctx.latitude = Some(lat);
        ctx.longitude = Some(lon);
        ctx
    }

    #[test]
    fn accepts_valid_and_absent_coordinates() {
        assert!(validate(&AccessContext::new("alice", "doc-1")).is_ok());
        assert!(validate(&ctx_at(10.8505, 76.2711)).is_ok());
        assert!(validate(&ctx_at(-90.0, 180.0)).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            validate(&ctx_at(91.0, 0.0)),
            Err(EngineError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            validate(&ctx_at(0.0, -181.0)),
            Err(EngineError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_partial_coordinates() {
        let mut ctx = AccessContext::new("alice", "doc-1");
        ctx.latitude = Some(10.0);
        assert!(matches!(
            validate(&ctx),
            Err(EngineError::PartialCoordinates)
        ));
    }
}
