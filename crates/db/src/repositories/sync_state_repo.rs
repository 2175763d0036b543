//! Repository for the `sync_states` table.

use agence_core::sync::{SYNC_STATUS_ERROR, SYNC_STATUS_OK};
use agence_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::sync_state::SyncState;

/// Column list for sync_states queries.
const COLUMNS: &str = "name, last_synced_at, last_status, last_message, updated_at";

/// Provides data access for sync bookkeeping.
pub struct SyncStateRepo;

impl SyncStateRepo {
    pub async fn find(pool: &PgPool, name: &str) -> Result<Option<SyncState>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sync_states WHERE name = $1");
        sqlx::query_as::<_, SyncState>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful run completed at `synced_at`.
    pub async fn record_success(
        pool: &PgPool,
        name: &str,
        synced_at: Timestamp,
        message: &str,
    ) -> Result<SyncState, sqlx::Error> {
        let query = format!(
            "INSERT INTO sync_states (name, last_synced_at, last_status, last_message)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (name) DO UPDATE SET
                last_synced_at = EXCLUDED.last_synced_at,
                last_status = EXCLUDED.last_status,
                last_message = EXCLUDED.last_message,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncState>(&query)
            .bind(name)
            .bind(synced_at)
            .bind(SYNC_STATUS_OK)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// Record a failed run. `last_synced_at` keeps the last success.
    pub async fn record_failure(
        pool: &PgPool,
        name: &str,
        message: &str,
    ) -> Result<SyncState, sqlx::Error> {
        let query = format!(
            "INSERT INTO sync_states (name, last_status, last_message)
             VALUES ($1, $2, $3)
             ON CONFLICT (name) DO UPDATE SET
                last_status = EXCLUDED.last_status,
                last_message = EXCLUDED.last_message,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncState>(&query)
            .bind(name)
            .bind(SYNC_STATUS_ERROR)
            .bind(message)
            .fetch_one(pool)
            .await
    }
}
