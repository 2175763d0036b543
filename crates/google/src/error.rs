//! Errors from the Google API layer.

/// Errors from the Google API layer.
#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Google returned a non-2xx status code.
    #[error("Google API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Places answered 200 with a non-`OK` status field.
    #[error("Places API returned {status}: {message}")]
    ApiStatus { status: String, message: String },

    /// OAuth credentials exist but no refresh token was provisioned.
    #[error("No Google OAuth refresh token configured (GOOGLE_REFRESH_TOKEN)")]
    MissingRefreshToken,

    /// A required setting is absent. Holds the environment variable name.
    #[error("Missing Google configuration: {0}")]
    MissingConfig(&'static str),

    /// A configured base URL cannot be used to build a request URL.
    #[error("Invalid Google API URL: {0}")]
    InvalidUrl(String),
}

impl GoogleApiError {
    /// Configuration problems abort a command instead of being counted
    /// as sync errors.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRefreshToken | Self::MissingConfig(_) | Self::InvalidUrl(_)
        )
    }
}
