//! Errors surfaced by worker commands.

use agence_core::error::CoreError;
use agence_db::DbError;
use agence_google::GoogleApiError;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Google(#[from] GoogleApiError),

    /// An environment variable is missing or unparsable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<DbError> for WorkerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(e) => WorkerError::Core(e),
            DbError::Database(e) => WorkerError::Database(e),
        }
    }
}
