//! GeoGate Engine — Per-request access decisions plus policy and
//! work-from-home override administration.
//!
//! The decision engine is generic over the `geogate-core` repository
//! traits so it has no dependency on the database crate.

pub mod auth_events;
pub mod context;
pub mod decision;
pub mod error;
pub mod policy;
pub mod wfh;

pub use auth_events::{AuthAction, AuthEventRecorder};
pub use decision::DecisionEngine;
pub use error::EngineError;
pub use policy::PolicyService;
pub use wfh::OverrideService;
