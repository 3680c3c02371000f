use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required configuration value was absent at startup.
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body could not be parsed as JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Retries ran out while the upstream was rate limiting.
    ///
    /// Distinguished from [`ProxyError::FetchFailed`] so callers can decide
    /// whether a stale-cache fallback applies.
    #[error("rate limited by upstream after {attempts} attempts")]
    RateLimitExhausted {
        /// How many upstream attempts were made.
        attempts: u32,
    },

    /// Retries ran out on transport failures alone, with no rate-limit signal.
    #[error("upstream fetch failed after {attempts} attempts")]
    FetchFailed {
        /// How many upstream attempts were made.
        attempts: u32,
    },

    /// The upstream returned an unexpected, non-retryable status code.
    #[error("unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The endpoint that returned the error, without its query string.
        url: String,
    },
}
