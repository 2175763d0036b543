//! Search Console Search Analytics client.

use agence_core::seo::QueryRow;
use agence_core::types::Date;
use serde::{Deserialize, Serialize};

use crate::error::GoogleApiError;
use crate::oauth::TokenProvider;
use crate::parse_response;

/// Request body of `searchAnalytics/query`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    start_date: String,
    end_date: String,
    dimensions: [&'a str; 1],
    row_limit: u32,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    /// Absent when the window has no data.
    #[serde(default)]
    rows: Vec<ApiRow>,
}

#[derive(Debug, Deserialize)]
struct ApiRow {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    clicks: f64,
    #[serde(default)]
    impressions: f64,
    #[serde(default)]
    ctr: f64,
    #[serde(default)]
    position: f64,
}

/// Client for one Search Console property.
#[derive(Debug)]
pub struct SearchConsoleClient {
    client: reqwest::Client,
    base_url: String,
    site_url: String,
    tokens: TokenProvider,
}

impl SearchConsoleClient {
    /// * `base_url` - API root, e.g. `https://www.googleapis.com`.
    /// * `site_url` - property, e.g. `sc-domain:example.fr`.
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        site_url: String,
        tokens: TokenProvider,
    ) -> Self {
        Self {
            client,
            base_url,
            site_url,
            tokens,
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Fetch per-query rows between `start` and `end` (inclusive).
    ///
    /// Sends `POST /webmasters/v3/sites/{site}/searchAnalytics/query` with
    /// the `query` dimension. Rows without a query key are dropped.
    pub async fn query_rows(
        &self,
        start: Date,
        end: Date,
        row_limit: u32,
    ) -> Result<Vec<QueryRow>, GoogleApiError> {
        let url = self.query_url()?;
        let token = self.tokens.access_token().await?;
        let body = QueryRequest {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            dimensions: ["query"],
            row_limit,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let parsed: QueryResponse = parse_response(response).await?;

        let rows: Vec<QueryRow> = parsed
            .rows
            .into_iter()
            .filter_map(|row| {
                let query = row.keys.into_iter().next()?;
                Some(QueryRow {
                    query,
                    clicks: row.clicks,
                    impressions: row.impressions,
                    ctr: row.ctr,
                    position: row.position,
                })
            })
            .collect();
        tracing::debug!(site = %self.site_url, %start, %end, rows = rows.len(), "Search Analytics rows fetched");
        Ok(rows)
    }

    /// The site URL is pushed as a single path segment, so its `/` are escaped.
    fn query_url(&self) -> Result<reqwest::Url, GoogleApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| GoogleApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| GoogleApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["webmasters", "v3", "sites"])
            .push(&self.site_url)
            .extend(["searchAnalytics", "query"]);
        Ok(url)
    }
}
