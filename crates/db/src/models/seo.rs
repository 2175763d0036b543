//! SEO keyword and daily position models.

use agence_core::error::CoreError;
use agence_core::seo::{validate_keyword, validate_keyword_source, KeywordMetrics};
use agence_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `seo_keywords` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SeoKeyword {
    pub id: DbId,
    pub keyword: String,
    pub source: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a tracked keyword.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeoKeyword {
    pub keyword: String,
    /// `manual` or `gsc`.
    pub source: String,
}

impl CreateSeoKeyword {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_keyword(&self.keyword)?;
        validate_keyword_source(&self.source)
    }
}

/// A row from the `seo_positions` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SeoPosition {
    pub id: DbId,
    pub keyword_id: DbId,
    pub date: Date,
    pub position: f64,
    pub clicks: i32,
    pub impressions: i32,
    pub ctr: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SeoPosition {
    pub fn metrics(&self) -> KeywordMetrics {
        KeywordMetrics {
            clicks: self.clicks,
            impressions: self.impressions,
            ctr: self.ctr,
            position: self.position,
        }
    }
}
