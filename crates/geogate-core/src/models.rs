//! Domain models for GeoGate.
//!
//! These are the core types shared across all crates.

pub mod analytics;
pub mod audit;
pub mod decision;
pub mod policy;
pub mod wfh;
