//! Search Console keyword position sync.

use agence_core::seo::{report_window, validate_keyword, KeywordMetrics, QueryIndex, KEYWORD_SOURCE_GSC};
use agence_core::sync::{SyncSummary, UpsertOutcome, SYNC_KEYWORDS};
use agence_core::types::{Date, DbId, Timestamp};
use agence_db::models::seo::CreateSeoKeyword;
use agence_db::repositories::{SeoKeywordRepo, SeoPositionRepo, SyncStateRepo};
use chrono::Days;
use sqlx::PgPool;

use crate::config::SyncSettings;
use crate::error::WorkerError;
use crate::sync::source::SearchAnalyticsSource;
use crate::sync::{check_freshness, record_outcome};

/// Switches of one keyword sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordSyncOptions {
    /// Ignore the freshness check.
    pub force: bool,
    /// Create `gsc` keywords from uncovered queries.
    pub import: bool,
    /// Purge old positions and deactivate stale imported keywords.
    pub cleanup: bool,
}

impl Default for KeywordSyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            import: true,
            cleanup: true,
        }
    }
}

/// Refresh the position of every active keyword for the latest complete
/// report window.
///
/// Positions are stored under the window end date. Keywords without any
/// matching query in the window are left alone.
pub async fn sync_keywords(
    pool: &PgPool,
    source: &dyn SearchAnalyticsSource,
    settings: &SyncSettings,
    options: KeywordSyncOptions,
    now: Timestamp,
) -> Result<SyncSummary, WorkerError> {
    if let Some(skipped) =
        check_freshness(pool, SYNC_KEYWORDS, now, settings.max_age, options.force).await?
    {
        return Ok(skipped);
    }

    let today = now.date_naive();
    let (start, end) = report_window(today, settings.lookback_days, settings.data_lag_days);

    let rows = match source.query_rows(start, end, settings.row_limit).await {
        Ok(rows) => rows,
        Err(e) if e.is_config_error() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, %start, %end, "Search Analytics query failed");
            let summary = SyncSummary::failed(e.to_string());
            SyncStateRepo::record_failure(pool, SYNC_KEYWORDS, &summary.describe()).await?;
            return Ok(summary);
        }
    };
    let index = QueryIndex::new(rows);
    let mut notes = vec![format!("{} queries", index.len())];

    if options.import {
        let imported = import_keywords(pool, &index, settings).await?;
        if imported > 0 {
            notes.push(format!("{imported} imported"));
        }
    }

    let mut summary = SyncSummary::default();
    for keyword in SeoKeywordRepo::list_active(pool).await? {
        let Some(metrics) = index.metrics_for(&keyword.keyword) else {
            tracing::debug!(keyword = %keyword.keyword, "No Search Console data");
            continue;
        };
        match upsert_position(pool, keyword.id, end, &metrics).await {
            Ok(outcome) => summary.record(outcome),
            Err(e) => {
                tracing::error!(error = %e, keyword_id = keyword.id, "Failed to store position");
                summary.record_error();
            }
        }
    }

    if options.cleanup {
        let (deleted, deactivated) = cleanup(pool, today, settings).await?;
        if deleted > 0 {
            notes.push(format!("{deleted} old positions deleted"));
        }
        if deactivated > 0 {
            notes.push(format!("{deactivated} stale keywords deactivated"));
        }
    }

    summary.message = notes.join(", ");
    record_outcome(pool, SYNC_KEYWORDS, now, &summary).await?;
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        unchanged = summary.unchanged,
        errors = summary.errors,
        %start,
        %end,
        "Keyword sync finished"
    );
    Ok(summary)
}

/// Insert, update or keep the position of a keyword on `date`.
pub async fn upsert_position(
    pool: &PgPool,
    keyword_id: DbId,
    date: Date,
    metrics: &KeywordMetrics,
) -> Result<UpsertOutcome, sqlx::Error> {
    match SeoPositionRepo::find_by_keyword_and_date(pool, keyword_id, date).await? {
        None => {
            SeoPositionRepo::insert(pool, keyword_id, date, metrics).await?;
            Ok(UpsertOutcome::Created)
        }
        Some(existing) if existing.metrics() == *metrics => Ok(UpsertOutcome::Unchanged),
        Some(existing) => {
            SeoPositionRepo::update(pool, existing.id, metrics).await?;
            Ok(UpsertOutcome::Updated)
        }
    }
}

async fn import_keywords(
    pool: &PgPool,
    index: &QueryIndex,
    settings: &SyncSettings,
) -> Result<usize, WorkerError> {
    let existing = SeoKeywordRepo::list_keyword_texts(pool).await?;
    let candidates = index.import_candidates(
        &existing,
        settings.import_min_impressions,
        settings.import_max_per_run,
    );

    let mut imported = 0;
    for row in candidates {
        if let Err(e) = validate_keyword(&row.query) {
            tracing::debug!(query = %row.query, error = %e, "Query not importable");
            continue;
        }
        let input = CreateSeoKeyword {
            keyword: row.query.clone(),
            source: KEYWORD_SOURCE_GSC.to_string(),
        };
        if let Some(keyword) = SeoKeywordRepo::insert_if_absent(pool, &input).await? {
            tracing::info!(keyword = %keyword.keyword, impressions = row.impressions, "Imported keyword from Search Console");
            imported += 1;
        }
    }
    Ok(imported)
}

async fn cleanup(
    pool: &PgPool,
    today: Date,
    settings: &SyncSettings,
) -> Result<(u64, u64), WorkerError> {
    let retention_cutoff = today - Days::new(settings.position_retention_days);
    let deleted = SeoPositionRepo::delete_older_than(pool, retention_cutoff).await?;

    let stale_cutoff = today - Days::new(settings.keyword_stale_days);
    let deactivated = SeoKeywordRepo::deactivate_stale(pool, stale_cutoff).await?;

    if deleted > 0 || deactivated > 0 {
        tracing::info!(deleted, deactivated, "SEO cleanup done");
    }
    Ok((deleted, deactivated))
}
