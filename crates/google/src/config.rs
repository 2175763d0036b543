//! Google API settings loaded from the environment.

use crate::error::GoogleApiError;
use crate::oauth::OAuthCredentials;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_SEARCH_CONSOLE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_PLACES_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_REVIEWS_LANGUAGE: &str = "fr";

/// Credentials and endpoints for the Google APIs.
///
/// Every credential is optional here; each client checks for what it needs
/// when it is built so a missing Places key does not block the keyword sync.
#[derive(Clone, Default)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    /// Search Console property, e.g. `sc-domain:example.fr`.
    pub site_url: Option<String>,
    pub places_api_key: Option<String>,
    pub place_id: Option<String>,
    pub reviews_language: String,
    pub token_url: String,
    pub search_console_url: String,
    pub places_url: String,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("site_url", &self.site_url)
            .field("places_api_key", &redact(&self.places_api_key))
            .field("place_id", &self.place_id)
            .field("reviews_language", &self.reviews_language)
            .field("token_url", &self.token_url)
            .field("search_console_url", &self.search_console_url)
            .field("places_url", &self.places_url)
            .finish()
    }
}

impl GoogleConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                                |
    /// |---------------------------|----------------------------------------|
    /// | `GOOGLE_CLIENT_ID`        | none                                   |
    /// | `GOOGLE_CLIENT_SECRET`    | none                                   |
    /// | `GOOGLE_REFRESH_TOKEN`    | none                                   |
    /// | `GSC_SITE_URL`            | none                                   |
    /// | `GOOGLE_PLACES_API_KEY`   | none                                   |
    /// | `GOOGLE_PLACE_ID`         | none                                   |
    /// | `GOOGLE_REVIEWS_LANGUAGE` | `fr`                                   |
    /// | `GOOGLE_TOKEN_URL`        | `https://oauth2.googleapis.com/token`  |
    /// | `GSC_API_BASE_URL`        | `https://www.googleapis.com`           |
    /// | `PLACES_API_BASE_URL`     | `https://maps.googleapis.com`          |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        Self {
            client_id: get("GOOGLE_CLIENT_ID"),
            client_secret: get("GOOGLE_CLIENT_SECRET"),
            refresh_token: get("GOOGLE_REFRESH_TOKEN"),
            site_url: get("GSC_SITE_URL"),
            places_api_key: get("GOOGLE_PLACES_API_KEY"),
            place_id: get("GOOGLE_PLACE_ID"),
            reviews_language: get_or("GOOGLE_REVIEWS_LANGUAGE", DEFAULT_REVIEWS_LANGUAGE),
            token_url: get_or("GOOGLE_TOKEN_URL", DEFAULT_TOKEN_URL),
            search_console_url: get_or("GSC_API_BASE_URL", DEFAULT_SEARCH_CONSOLE_URL),
            places_url: get_or("PLACES_API_BASE_URL", DEFAULT_PLACES_URL),
        }
    }

    /// OAuth credentials for the refresh-token grant.
    ///
    /// A missing refresh token is reported separately: it means the
    /// account was never connected, not that the deployment is broken.
    pub fn oauth_credentials(&self) -> Result<OAuthCredentials, GoogleApiError> {
        let client_id = self
            .client_id
            .clone()
            .ok_or(GoogleApiError::MissingConfig("GOOGLE_CLIENT_ID"))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or(GoogleApiError::MissingConfig("GOOGLE_CLIENT_SECRET"))?;
        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or(GoogleApiError::MissingRefreshToken)?;
        Ok(OAuthCredentials {
            client_id,
            client_secret,
            refresh_token,
        })
    }

    pub fn require_site_url(&self) -> Result<&str, GoogleApiError> {
        self.site_url
            .as_deref()
            .ok_or(GoogleApiError::MissingConfig("GSC_SITE_URL"))
    }

    pub fn require_places_api_key(&self) -> Result<&str, GoogleApiError> {
        self.places_api_key
            .as_deref()
            .ok_or(GoogleApiError::MissingConfig("GOOGLE_PLACES_API_KEY"))
    }

    pub fn require_place_id(&self) -> Result<&str, GoogleApiError> {
        self.place_id
            .as_deref()
            .ok_or(GoogleApiError::MissingConfig("GOOGLE_PLACE_ID"))
    }
}
