//! Database-specific error types and conversions.

use geogate_core::error::GeogateError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<DbError> for GeogateError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => GeogateError::NotFound { entity, id },
            other => GeogateError::Database(other.to_string()),
        }
    }
}
