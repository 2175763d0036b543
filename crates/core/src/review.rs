//! Google review reconciliation.
//!
//! Places does not expose a stable review id, so a review is identified by
//! its author name and publication time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sync::UpsertOutcome;
use crate::types::Timestamp;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// The fields of a review that the site displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub author_name: String,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub rating: i16,
    pub text: Option<String>,
    pub language: Option<String>,
    pub published_at: Timestamp,
}

impl ReviewSnapshot {
    /// Whether both snapshots describe the same review.
    pub fn same_review(&self, other: &ReviewSnapshot) -> bool {
        self.author_name == other.author_name && self.published_at == other.published_at
    }

    /// Whether any displayed field differs. Empty text counts as no text.
    pub fn differs_from(&self, other: &ReviewSnapshot) -> bool {
        self.rating != other.rating
            || non_empty(&self.text) != non_empty(&other.text)
            || non_empty(&self.author_url) != non_empty(&other.author_url)
            || non_empty(&self.profile_photo_url) != non_empty(&other.profile_photo_url)
            || non_empty(&self.language) != non_empty(&other.language)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Decide what a sync must do with an incoming review.
pub fn classify(existing: Option<&ReviewSnapshot>, incoming: &ReviewSnapshot) -> UpsertOutcome {
    match existing {
        None => UpsertOutcome::Created,
        Some(current) if current.differs_from(incoming) => UpsertOutcome::Updated,
        Some(_) => UpsertOutcome::Unchanged,
    }
}

pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Review rating must be between {MIN_RATING} and {MAX_RATING} (got {rating})"
        )))
    }
}

/// Mean rating rounded to one decimal, as shown on the site.
pub fn average_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
