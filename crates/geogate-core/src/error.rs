//! Error types for the GeoGate system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeogateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid state transition: {entity} from {from} to {to}")]
    InvalidTransition {
        entity: String,
        from: String,
        to: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

pub type GeogateResult<T> = Result<T, GeogateError>;
