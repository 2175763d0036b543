//! Upstream data sources of the syncs.
//!
//! The Google clients implement these traits; tests substitute fakes.

use agence_core::review::ReviewSnapshot;
use agence_core::seo::QueryRow;
use agence_core::types::Date;
use agence_google::{GoogleApiError, PlacesClient, SearchConsoleClient};
use async_trait::async_trait;

/// Per-query Search Analytics data.
#[async_trait]
pub trait SearchAnalyticsSource: Send + Sync {
    async fn query_rows(
        &self,
        start: Date,
        end: Date,
        row_limit: u32,
    ) -> Result<Vec<QueryRow>, GoogleApiError>;
}

/// Reviews of the business listing.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_reviews(&self) -> Result<Vec<ReviewSnapshot>, GoogleApiError>;
}

#[async_trait]
impl SearchAnalyticsSource for SearchConsoleClient {
    async fn query_rows(
        &self,
        start: Date,
        end: Date,
        row_limit: u32,
    ) -> Result<Vec<QueryRow>, GoogleApiError> {
        SearchConsoleClient::query_rows(self, start, end, row_limit).await
    }
}

#[async_trait]
impl ReviewSource for PlacesClient {
    async fn fetch_reviews(&self) -> Result<Vec<ReviewSnapshot>, GoogleApiError> {
        PlacesClient::fetch_reviews(self).await
    }
}
