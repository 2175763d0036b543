//! Synchronization bookkeeping shared by the SEO and review syncs.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

/// `sync_states.name` for the Search Console keyword sync.
pub const SYNC_KEYWORDS: &str = "seo_keywords";

/// `sync_states.name` for the Google reviews sync.
pub const SYNC_REVIEWS: &str = "google_reviews";

/// Data younger than this is considered fresh and not re-synced.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 12;

pub const SYNC_STATUS_OK: &str = "ok";
pub const SYNC_STATUS_ERROR: &str = "error";

/// Whether the last successful sync is recent enough to skip a new one.
pub fn is_fresh(last_synced_at: Option<Timestamp>, now: Timestamp, max_age: Duration) -> bool {
    last_synced_at.is_some_and(|last| now - last < max_age)
}

/// Result of reconciling one upstream record with the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Counters reported by a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub errors: u32,
    pub skipped: bool,
    pub message: String,
}

impl SyncSummary {
    /// A run that did nothing because the cache is still fresh.
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            skipped: true,
            message: message.into(),
            ..Self::default()
        }
    }

    /// A run aborted by an upstream failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            errors: 1,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// One-line description used for logs and `sync_states.last_message`.
    pub fn describe(&self) -> String {
        if self.skipped {
            return self.message.clone();
        }
        let counts = format!(
            "{} created, {} updated, {} unchanged, {} errors",
            self.created, self.updated, self.unchanged, self.errors
        );
        if self.message.is_empty() {
            counts
        } else {
            format!("{counts} ({})", self.message)
        }
    }
}
