//! Places Details client for the business reviews.

use agence_core::review::ReviewSnapshot;
use chrono::DateTime;
use serde::Deserialize;

use crate::error::GoogleApiError;
use crate::parse_response;

const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceResult>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    reviews: Vec<ApiReview>,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    author_name: String,
    #[serde(default)]
    author_url: Option<String>,
    #[serde(default)]
    profile_photo_url: Option<String>,
    rating: i16,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    language: Option<String>,
    /// Publication time, Unix seconds.
    time: i64,
}

/// Client for the reviews of one place.
pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    place_id: String,
    language: String,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url)
            .field("place_id", &self.place_id)
            .field("language", &self.language)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        place_id: String,
        language: String,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            place_id,
            language,
        }
    }

    /// Fetch the reviews Places exposes for the place (at most five).
    ///
    /// Sends `GET /maps/api/place/details/json`. A 200 answer whose `status`
    /// is not `OK` becomes [`GoogleApiError::ApiStatus`]; `ZERO_RESULTS`
    /// is treated as no reviews.
    pub async fn fetch_reviews(&self) -> Result<Vec<ReviewSnapshot>, GoogleApiError> {
        let response = self
            .client
            .get(format!(
                "{}/maps/api/place/details/json",
                self.base_url.trim_end_matches('/')
            ))
            .query(&[
                ("place_id", self.place_id.as_str()),
                ("fields", "reviews"),
                ("language", self.language.as_str()),
                ("reviews_sort", "newest"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let details: DetailsResponse = parse_response(response).await?;

        match details.status.as_str() {
            STATUS_OK => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            _ => {
                return Err(GoogleApiError::ApiStatus {
                    message: details
                        .error_message
                        .unwrap_or_else(|| "no error message".to_string()),
                    status: details.status,
                })
            }
        }

        let reviews = details
            .result
            .unwrap_or_default()
            .reviews
            .into_iter()
            .filter_map(|review| {
                let Some(published_at) = DateTime::from_timestamp(review.time, 0) else {
                    tracing::warn!(author = %review.author_name, time = review.time, "Skipping review with invalid timestamp");
                    return None;
                };
                Some(ReviewSnapshot {
                    author_name: review.author_name,
                    author_url: review.author_url,
                    profile_photo_url: review.profile_photo_url,
                    rating: review.rating,
                    text: review.text,
                    language: review.language,
                    published_at,
                })
            })
            .collect();
        Ok(reviews)
    }
}
