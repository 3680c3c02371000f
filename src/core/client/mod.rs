//! Public client surface + builder.
//! Internals are split into `constants` (endpoint + query defaults) and
//! `retry` (backoff policy).

mod constants;
mod retry;

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::core::ProxyError;
use constants::{
    DEFAULT_BASE_TIMELINES, DEFAULT_FIELDS, DEFAULT_LOCATION, DEFAULT_TIMEOUT, DEFAULT_TIMESTEPS,
    DEFAULT_UNITS, USER_AGENT,
};

pub use retry::{Backoff, RetryConfig};

/// HTTP client for the Tomorrow.io timelines endpoint.
///
/// Holds the configured [`reqwest::Client`], the fixed upstream query, and
/// the retry policy. All values are set once at build time and immutable
/// afterwards.
#[derive(Clone)]
pub struct TomorrowClient {
    http: Client,
    base_timelines: Url,
    api_key: String,
    location: String,
    timesteps: String,
    units: String,
    fields: String,
    retry: RetryConfig,
}

impl TomorrowClient {
    /// Create a new builder.
    pub fn builder() -> TomorrowClientBuilder {
        TomorrowClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// The configured retry policy.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// The upstream endpoint, without its query string.
    pub fn endpoint(&self) -> &Url {
        &self.base_timelines
    }

    /// The full upstream request URL, fixed query parameters included.
    pub(crate) fn timelines_url(&self) -> Url {
        let mut url = self.base_timelines.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("location", &self.location)
            .append_pair("timesteps", &self.timesteps)
            .append_pair("units", &self.units)
            .append_pair("fields", &self.fields);
        url
    }
}

// The API key stays out of Debug output; it would otherwise end up in logs.
impl fmt::Debug for TomorrowClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TomorrowClient")
            .field("base_timelines", &self.base_timelines)
            .field("location", &self.location)
            .field("timesteps", &self.timesteps)
            .field("units", &self.units)
            .field("fields", &self.fields)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct TomorrowClientBuilder {
    api_key: Option<String>,
    base_timelines: Option<Url>,
    location: Option<String>,
    timesteps: Option<String>,
    units: Option<String>,
    fields: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
}

impl TomorrowClientBuilder {
    /// Set the Tomorrow.io API key. Required.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the timelines endpoint (e.g., `https://api.tomorrow.io/v4/timelines`).
    pub fn base_timelines(mut self, url: Url) -> Self {
        self.base_timelines = Some(url);
        self
    }

    /// Override the reported coordinate.
    pub fn location(mut self, s: impl Into<String>) -> Self {
        self.location = Some(s.into());
        self
    }

    /// Override the timestep query parameter.
    pub fn timesteps(mut self, s: impl Into<String>) -> Self {
        self.timesteps = Some(s.into());
        self
    }

    /// Override the units query parameter.
    pub fn units(mut self, s: impl Into<String>) -> Self {
        self.units = Some(s.into());
        self
    }

    /// Override the requested data fields.
    pub fn fields(mut self, s: impl Into<String>) -> Self {
        self.fields = Some(s.into());
        self
    }

    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the per-attempt request timeout. Default: 10 seconds.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn retry(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::MissingConfig`] if no API key was provided, and
    /// [`ProxyError::Http`] or [`ProxyError::Url`] if the underlying HTTP
    /// client or a default URL cannot be constructed.
    pub fn build(self) -> Result<TomorrowClient, ProxyError> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or(ProxyError::MissingConfig("api key"))?;

        let base_timelines = match self.base_timelines {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_TIMELINES)?,
        };

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));

        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(TomorrowClient {
            http,
            base_timelines,
            api_key,
            location: self.location.unwrap_or_else(|| DEFAULT_LOCATION.into()),
            timesteps: self.timesteps.unwrap_or_else(|| DEFAULT_TIMESTEPS.into()),
            units: self.units.unwrap_or_else(|| DEFAULT_UNITS.into()),
            fields: self.fields.unwrap_or_else(|| DEFAULT_FIELDS.into()),
            retry: self.retry.unwrap_or_default(),
        })
    }
}
