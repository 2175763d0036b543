//! `seo-sync`: refresh keyword positions and cached reviews from Google.

use std::time::Duration;

use agence_core::sync::SyncSummary;
use agence_core::types::Timestamp;
use agence_google::{GoogleApiError, GoogleConfig, PlacesClient, SearchConsoleClient, TokenProvider};
use sqlx::PgPool;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::sync::{sync_keywords, sync_reviews, KeywordSyncOptions};

/// Timeout of every Google API request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Which parts of the sync to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeoSyncOptions {
    pub keywords: bool,
    pub reviews: bool,
    pub keyword: KeywordSyncOptions,
}

impl Default for SeoSyncOptions {
    fn default() -> Self {
        Self {
            keywords: true,
            reviews: true,
            keyword: KeywordSyncOptions::default(),
        }
    }
}

impl SeoSyncOptions {
    pub fn force(&self) -> bool {
        self.keyword.force
    }
}

/// Per-part summaries of one `seo-sync` run. Parts not run are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoSyncReport {
    pub keywords: Option<SyncSummary>,
    pub reviews: Option<SyncSummary>,
}

impl SeoSyncReport {
    pub fn total_errors(&self) -> u32 {
        [&self.keywords, &self.reviews]
            .into_iter()
            .flatten()
            .map(|summary| summary.errors)
            .sum()
    }

    pub fn is_success(&self) -> bool {
        self.total_errors() == 0
    }
}

/// Run the requested syncs against the configured Google APIs.
///
/// Missing Google configuration aborts with an error; upstream failures are
/// reported in the summaries.
pub async fn run(
    pool: &PgPool,
    config: &WorkerConfig,
    options: SeoSyncOptions,
    now: Timestamp,
) -> Result<SeoSyncReport, WorkerError> {
    let http = http_client()?;
    let mut report = SeoSyncReport::default();

    if options.keywords {
        let client = search_console_client(&config.google, http.clone())?;
        tracing::info!(site = client.site_url(), force = options.force(), "Syncing SEO keywords");
        report.keywords =
            Some(sync_keywords(pool, &client, &config.sync, options.keyword, now).await?);
    }

    if options.reviews {
        let client = places_client(&config.google, http)?;
        tracing::info!(force = options.force(), "Syncing Google reviews");
        report.reviews = Some(sync_reviews(pool, &client, &config.sync, options.force(), now).await?);
    }

    Ok(report)
}

pub fn http_client() -> Result<reqwest::Client, WorkerError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| WorkerError::Google(GoogleApiError::Request(e)))
}

pub fn search_console_client(
    config: &GoogleConfig,
    http: reqwest::Client,
) -> Result<SearchConsoleClient, GoogleApiError> {
    let credentials = config.oauth_credentials()?;
    let site_url = config.require_site_url()?.to_string();
    let tokens = TokenProvider::new(http.clone(), config.token_url.clone(), credentials);
    Ok(SearchConsoleClient::new(
        http,
        config.search_console_url.clone(),
        site_url,
        tokens,
    ))
}

pub fn places_client(
    config: &GoogleConfig,
    http: reqwest::Client,
) -> Result<PlacesClient, GoogleApiError> {
    Ok(PlacesClient::new(
        http,
        config.places_url.clone(),
        config.require_places_api_key()?.to_string(),
        config.require_place_id()?.to_string(),
        config.reviews_language.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn report_sums_errors_of_parts_run() {
        let report = SeoSyncReport {
            keywords: Some(SyncSummary::failed("HTTP 500")),
            reviews: None,
        };
        assert_eq!(report.total_errors(), 1);
        assert!(!report.is_success());
        assert!(SeoSyncReport::default().is_success());
    }

    #[test]
    fn keyword_client_requires_refresh_token() {
        let config = GoogleConfig::from_lookup(|name| match name {
            "GOOGLE_CLIENT_ID" => Some("id".to_string()),
            "GOOGLE_CLIENT_SECRET" => Some("secret".to_string()),
            "GSC_SITE_URL" => Some("sc-domain:example.fr".to_string()),
            _ => None,
        });
        assert_matches!(
            search_console_client(&config, reqwest::Client::new()),
            Err(GoogleApiError::MissingRefreshToken)
        );
    }

    #[test]
    fn places_client_requires_key_and_place() {
        let config = GoogleConfig::from_lookup(|name| match name {
            "GOOGLE_PLACES_API_KEY" => Some("key".to_string()),
            _ => None,
        });
        assert_matches!(
            places_client(&config, reqwest::Client::new()),
            Err(GoogleApiError::MissingConfig("GOOGLE_PLACE_ID"))
        );
    }
}
