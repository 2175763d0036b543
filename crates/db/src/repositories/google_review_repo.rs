//! Repository for the `google_reviews` table.

use agence_core::review::ReviewSnapshot;
use agence_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::google_review::GoogleReview;

/// Column list for google_reviews queries.
const COLUMNS: &str = "id, author_name, author_url, profile_photo_url, rating, text, language, \
    published_at, created_at, updated_at";

/// Provides data access for the cached Google reviews.
pub struct GoogleReviewRepo;

impl GoogleReviewRepo {
    /// Find a review by its identity: author name and publication time.
    pub async fn find_by_identity(
        pool: &PgPool,
        author_name: &str,
        published_at: Timestamp,
    ) -> Result<Option<GoogleReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM google_reviews
             WHERE author_name = $1 AND published_at = $2"
        );
        sqlx::query_as::<_, GoogleReview>(&query)
            .bind(author_name)
            .bind(published_at)
            .fetch_optional(pool)
            .await
    }

    /// Insert a review seen for the first time.
    pub async fn insert(pool: &PgPool, review: &ReviewSnapshot) -> Result<GoogleReview, sqlx::Error> {
        let query = format!(
            "INSERT INTO google_reviews
                (author_name, author_url, profile_photo_url, rating, text, language, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GoogleReview>(&query)
            .bind(&review.author_name)
            .bind(&review.author_url)
            .bind(&review.profile_photo_url)
            .bind(review.rating)
            .bind(&review.text)
            .bind(&review.language)
            .bind(review.published_at)
            .fetch_one(pool)
            .await
    }

    /// Overwrite the displayed fields of a stored review.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        review: &ReviewSnapshot,
    ) -> Result<Option<GoogleReview>, sqlx::Error> {
        let query = format!(
            "UPDATE google_reviews SET
                author_url = $2, profile_photo_url = $3, rating = $4, text = $5,
                language = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GoogleReview>(&query)
            .bind(id)
            .bind(&review.author_url)
            .bind(&review.profile_photo_url)
            .bind(review.rating)
            .bind(&review.text)
            .bind(&review.language)
            .fetch_optional(pool)
            .await
    }

    /// Most recently published reviews.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<GoogleReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM google_reviews
             ORDER BY published_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, GoogleReview>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Ratings of every cached review.
    pub async fn list_ratings(pool: &PgPool) -> Result<Vec<i16>, sqlx::Error> {
        let rows: Vec<(i16,)> = sqlx::query_as("SELECT rating FROM google_reviews")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(rating,)| rating).collect())
    }
}
