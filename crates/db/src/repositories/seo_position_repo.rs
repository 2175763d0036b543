//! Repository for the `seo_positions` table.

use agence_core::seo::KeywordMetrics;
use agence_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::seo::SeoPosition;

/// Column list for seo_positions queries.
const COLUMNS: &str =
    "id, keyword_id, date, position, clicks, impressions, ctr, created_at, updated_at";

/// Provides data access for daily keyword positions.
pub struct SeoPositionRepo;

impl SeoPositionRepo {
    /// Find the position of a keyword on a given date.
    pub async fn find_by_keyword_and_date(
        pool: &PgPool,
        keyword_id: DbId,
        date: Date,
    ) -> Result<Option<SeoPosition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seo_positions
             WHERE keyword_id = $1 AND date = $2"
        );
        sqlx::query_as::<_, SeoPosition>(&query)
            .bind(keyword_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new position row.
    pub async fn insert(
        pool: &PgPool,
        keyword_id: DbId,
        date: Date,
        metrics: &KeywordMetrics,
    ) -> Result<SeoPosition, sqlx::Error> {
        let query = format!(
            "INSERT INTO seo_positions (keyword_id, date, position, clicks, impressions, ctr)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeoPosition>(&query)
            .bind(keyword_id)
            .bind(date)
            .bind(metrics.position)
            .bind(metrics.clicks)
            .bind(metrics.impressions)
            .bind(metrics.ctr)
            .fetch_one(pool)
            .await
    }

    /// Overwrite the metrics of an existing row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        metrics: &KeywordMetrics,
    ) -> Result<Option<SeoPosition>, sqlx::Error> {
        let query = format!(
            "UPDATE seo_positions SET
                position = $2, clicks = $3, impressions = $4, ctr = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SeoPosition>(&query)
            .bind(id)
            .bind(metrics.position)
            .bind(metrics.clicks)
            .bind(metrics.impressions)
            .bind(metrics.ctr)
            .fetch_optional(pool)
            .await
    }

    /// Most recent positions of a keyword, newest first.
    pub async fn list_for_keyword(
        pool: &PgPool,
        keyword_id: DbId,
        limit: i64,
    ) -> Result<Vec<SeoPosition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seo_positions
             WHERE keyword_id = $1
             ORDER BY date DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, SeoPosition>(&query)
            .bind(keyword_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete positions dated before `cutoff`. Returns the number of rows deleted.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Date) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM seo_positions WHERE date < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
