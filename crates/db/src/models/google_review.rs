//! Cached Google review model.

use agence_core::review::ReviewSnapshot;
use agence_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `google_reviews` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GoogleReview {
    pub id: DbId,
    pub author_name: String,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub rating: i16,
    pub text: Option<String>,
    pub language: Option<String>,
    pub published_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GoogleReview {
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot {
            author_name: self.author_name.clone(),
            author_url: self.author_url.clone(),
            profile_photo_url: self.profile_photo_url.clone(),
            rating: self.rating,
            text: self.text.clone(),
            language: self.language.clone(),
            published_at: self.published_at,
        }
    }
}
