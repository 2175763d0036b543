//! Repository for the `seo_keywords` table.

use agence_core::seo::KEYWORD_SOURCE_GSC;
use agence_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::seo::{CreateSeoKeyword, SeoKeyword};

/// Column list for seo_keywords queries.
const COLUMNS: &str = "id, keyword, source, is_active, created_at, updated_at";

/// Provides data access for tracked SEO keywords.
pub struct SeoKeywordRepo;

impl SeoKeywordRepo {
    /// Insert a new keyword. Fails on `uq_seo_keywords_keyword` if it exists.
    pub async fn create(pool: &PgPool, input: &CreateSeoKeyword) -> DbResult<SeoKeyword> {
        input.validate()?;
        let query = format!(
            "INSERT INTO seo_keywords (keyword, source)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let keyword = sqlx::query_as::<_, SeoKeyword>(&query)
            .bind(input.keyword.trim())
            .bind(&input.source)
            .fetch_one(pool)
            .await?;
        Ok(keyword)
    }

    /// Insert a keyword unless the exact text is already stored.
    ///
    /// Returns `None` when it already existed.
    pub async fn insert_if_absent(
        pool: &PgPool,
        input: &CreateSeoKeyword,
    ) -> DbResult<Option<SeoKeyword>> {
        input.validate()?;
        let query = format!(
            "INSERT INTO seo_keywords (keyword, source)
             VALUES ($1, $2)
             ON CONFLICT (keyword) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let keyword = sqlx::query_as::<_, SeoKeyword>(&query)
            .bind(input.keyword.trim())
            .bind(&input.source)
            .fetch_optional(pool)
            .await?;
        Ok(keyword)
    }

    /// Find a keyword by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SeoKeyword>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seo_keywords WHERE id = $1");
        sqlx::query_as::<_, SeoKeyword>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Keywords currently tracked, alphabetically.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<SeoKeyword>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seo_keywords
             WHERE is_active
             ORDER BY keyword ASC"
        );
        sqlx::query_as::<_, SeoKeyword>(&query).fetch_all(pool).await
    }

    /// Text of every stored keyword, active or not.
    pub async fn list_keyword_texts(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT keyword FROM seo_keywords")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(keyword,)| keyword).collect())
    }

    /// Enable or disable tracking. Returns `true` if the keyword exists.
    pub async fn set_active(pool: &PgPool, id: DbId, is_active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE seo_keywords SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate imported keywords created before `cutoff` that have no
    /// position on or after it. Manual keywords are never touched.
    ///
    /// Returns the number of keywords deactivated.
    pub async fn deactivate_stale(pool: &PgPool, cutoff: Date) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE seo_keywords k SET is_active = FALSE, updated_at = NOW()
             WHERE k.is_active
               AND k.source = $1
               AND k.created_at::date < $2
               AND NOT EXISTS (
                   SELECT 1 FROM seo_positions p
                   WHERE p.keyword_id = k.id AND p.date >= $2
               )",
        )
        .bind(KEYWORD_SOURCE_GSC)
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
