//! Database-specific error types and conversions.

use vendo_core::error::VendoError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<DbError> for VendoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => VendoError::NotFound { entity, id },
            DbError::Conflict(reason) => VendoError::Conflict { reason },
            other => VendoError::Database(other.to_string()),
        }
    }
}
