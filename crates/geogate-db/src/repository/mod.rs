//! SurrealDB repository implementations.

mod audit;
mod policy;
mod wfh;

pub use audit::SurrealAuditLogRepository;
pub use policy::SurrealPolicyRepository;
pub use wfh::SurrealOverrideRepository;
