//! Errors of repository operations that validate their input.

use agence_core::error::CoreError;

/// Either rejected input or a database failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The input broke a domain rule; nothing was written.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;
