//! GeoGate Analytics — Batch risk analysis over the audit log.
//!
//! Combines an unsupervised statistical outlier scorer with four
//! rule-based detectors, then aggregates per-actor and global risk
//! assessments. Pure read over the audit log: concurrent analyses over
//! overlapping windows are safe, and a long scan is cancelled by
//! dropping its future.

pub mod aggregate;
pub mod analyzer;
pub mod features;
pub mod rules;
pub mod scorer;
pub mod statistical;

pub use analyzer::RiskAnalyzer;
pub use scorer::{MeanZScoreScorer, OutlierScorer};
