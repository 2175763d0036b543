//! SEO keyword and Google review synchronization.
//!
//! Both syncs follow the same shape: skip when the last successful run is
//! still fresh, fetch from Google once, reconcile every record with the
//! local cache, then record the outcome in `sync_states`. Upstream failures
//! are counted in the summary rather than retried.

pub mod keywords;
pub mod reviews;
pub mod source;

use agence_core::sync::SyncSummary;
use agence_core::types::Timestamp;
use agence_db::repositories::SyncStateRepo;
use sqlx::PgPool;

pub use keywords::{sync_keywords, KeywordSyncOptions};
pub use reviews::sync_reviews;
pub use source::{ReviewSource, SearchAnalyticsSource};

use crate::error::WorkerError;

/// Summary of a skipped run, or `None` when the sync must proceed.
async fn check_freshness(
    pool: &PgPool,
    name: &str,
    now: Timestamp,
    max_age: chrono::Duration,
    force: bool,
) -> Result<Option<SyncSummary>, WorkerError> {
    if force {
        return Ok(None);
    }
    let last_synced_at = SyncStateRepo::find(pool, name)
        .await?
        .and_then(|state| state.last_synced_at);

    if agence_core::sync::is_fresh(last_synced_at, now, max_age) {
        let message = match last_synced_at {
            Some(at) => format!("Last sync at {} is still fresh", at.format("%Y-%m-%d %H:%M")),
            None => "Still fresh".to_string(),
        };
        tracing::info!(sync = name, "{message}, skipping");
        return Ok(Some(SyncSummary::skipped(message)));
    }
    Ok(None)
}

/// Store the outcome of a completed run. A run with errors leaves
/// `last_synced_at` untouched so the next pass retries it.
async fn record_outcome(
    pool: &PgPool,
    name: &str,
    now: Timestamp,
    summary: &SyncSummary,
) -> Result<(), WorkerError> {
    let description = summary.describe();
    if summary.has_errors() {
        SyncStateRepo::record_failure(pool, name, &description).await?;
    } else {
        SyncStateRepo::record_success(pool, name, now, &description).await?;
    }
    Ok(())
}
