//! Sync bookkeeping model.

use agence_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sync_states` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SyncState {
    pub name: String,
    /// Time of the last successful run; failures leave it untouched.
    pub last_synced_at: Option<Timestamp>,
    pub last_status: Option<String>,
    pub last_message: Option<String>,
    pub updated_at: Timestamp,
}
