//! HTTP clients for the Google APIs polled by the sync commands.
//!
//! - [`oauth`]: refresh-token grant against the OAuth2 token endpoint
//! - [`search_console`]: Search Analytics queries for the tracked site
//! - [`places`]: Place Details reviews
//!
//! Base URLs come from [`config::GoogleConfig`] so tests can point the
//! clients at a local mock server.

pub mod config;
pub mod error;
pub mod oauth;
pub mod places;
pub mod search_console;

pub use config::GoogleConfig;
pub use error::GoogleApiError;
pub use oauth::{OAuthCredentials, TokenProvider};
pub use places::PlacesClient;
pub use search_console::SearchConsoleClient;

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`GoogleApiError::ApiError`] containing the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, GoogleApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(GoogleApiError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GoogleApiError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
