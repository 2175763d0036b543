//! Google review cache sync.

use agence_core::review::{average_rating, classify, validate_rating, ReviewSnapshot};
use agence_core::sync::{SyncSummary, UpsertOutcome, SYNC_REVIEWS};
use agence_core::types::Timestamp;
use agence_db::repositories::{GoogleReviewRepo, SyncStateRepo};
use sqlx::PgPool;

use crate::config::SyncSettings;
use crate::error::WorkerError;
use crate::sync::source::ReviewSource;
use crate::sync::{check_freshness, record_outcome};

/// Reconcile the cached reviews with what Google currently shows.
///
/// Reviews are never deleted: Places only exposes the latest few.
pub async fn sync_reviews(
    pool: &PgPool,
    source: &dyn ReviewSource,
    settings: &SyncSettings,
    force: bool,
    now: Timestamp,
) -> Result<SyncSummary, WorkerError> {
    if let Some(skipped) = check_freshness(pool, SYNC_REVIEWS, now, settings.max_age, force).await? {
        return Ok(skipped);
    }

    let reviews = match source.fetch_reviews().await {
        Ok(reviews) => reviews,
        Err(e) if e.is_config_error() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Places reviews fetch failed");
            let summary = SyncSummary::failed(e.to_string());
            SyncStateRepo::record_failure(pool, SYNC_REVIEWS, &summary.describe()).await?;
            return Ok(summary);
        }
    };

    let mut summary = SyncSummary::default();
    for review in &reviews {
        if let Err(e) = validate_rating(review.rating) {
            tracing::warn!(author = %review.author_name, error = %e, "Skipping review");
            summary.record_error();
            continue;
        }
        match upsert_review(pool, review).await {
            Ok(outcome) => summary.record(outcome),
            Err(e) => {
                tracing::error!(error = %e, author = %review.author_name, "Failed to store review");
                summary.record_error();
            }
        }
    }
    summary.message = match average_rating(&GoogleReviewRepo::list_ratings(pool).await?) {
        Some(average) => format!("{} reviews fetched, average {average:.1}/5", reviews.len()),
        None => format!("{} reviews fetched", reviews.len()),
    };

    record_outcome(pool, SYNC_REVIEWS, now, &summary).await?;
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        unchanged = summary.unchanged,
        errors = summary.errors,
        "Review sync finished"
    );
    Ok(summary)
}

async fn upsert_review(pool: &PgPool, review: &ReviewSnapshot) -> Result<UpsertOutcome, sqlx::Error> {
    let existing =
        GoogleReviewRepo::find_by_identity(pool, &review.author_name, review.published_at).await?;
    let outcome = classify(existing.as_ref().map(|r| r.snapshot()).as_ref(), review);

    match (outcome, existing) {
        (UpsertOutcome::Created, _) => {
            GoogleReviewRepo::insert(pool, review).await?;
        }
        (UpsertOutcome::Updated, Some(stored)) => {
            GoogleReviewRepo::update(pool, stored.id, review).await?;
        }
        _ => {}
    }
    Ok(outcome)
}
