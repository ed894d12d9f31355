//! GeoGate Core — Domain models, error types, geodesic math, and
//! repository trait definitions.
//!
//! These are the core types shared across all crates. This crate has no
//! I/O dependencies; persistence lives in `geogate-db` and orchestration
//! in `geogate-engine` / `geogate-analytics`.

pub mod error;
pub mod geo;
pub mod models;
pub mod repository;

pub use error::{GeogateError, GeogateResult};
