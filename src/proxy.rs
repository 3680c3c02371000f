//! Request handler: consult the cache, fetch with backoff, fall back to
//! stale data when the upstream is rate limiting.

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::core::{FreshnessCache, ProxyError, TomorrowClient, timelines};
use crate::notify::{Notifier, RateLimitLatch};

/// Where a served payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Fresh cache hit; the upstream was not contacted.
    Cache,
    /// Fetched from the upstream on this request.
    Upstream,
    /// Last known-good payload, served because the upstream is rate limiting.
    Stale,
}

/// A successfully served weather payload.
#[derive(Debug, Clone)]
pub struct WeatherReply {
    /// JSON body to return to the client. For stale replies the payload
    /// carries `stale_data_returned: true` and `error_code: 429`.
    pub body: Value,
    /// Provenance of the payload.
    pub source: ReplySource,
}

impl WeatherReply {
    /// HTTP status for this reply. Always 200; a stale fallback still counts
    /// as a successful response.
    #[must_use]
    pub fn status(&self) -> u16 {
        200
    }

    /// Whether this reply carries stale fallback data.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.source == ReplySource::Stale
    }
}

/// Terminal request failures, mapped to status codes at the boundary.
///
/// Internals (transport errors, upstream bodies) never leak through here;
/// only a status code and a short description reach the client.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Rate limited with zero cached data ever available.
    #[error("rate limited by Tomorrow.io and no cached data available")]
    RateLimited,
    /// The upstream failed for a non-rate-limit reason.
    #[error("failed to fetch data from Tomorrow.io")]
    UpstreamFailed,
}

impl ServeError {
    /// The HTTP status code this failure maps to.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::UpstreamFailed => 502,
        }
    }

    /// JSON body with a short description of the failure.
    #[must_use]
    pub fn body(&self) -> Value {
        json!({ "description": self.to_string() })
    }
}

/// Serves the single weather resource.
///
/// Owns the cache and notification state it orchestrates, so tests can build
/// isolated instances; nothing here is process-global.
#[derive(Debug)]
pub struct WeatherProxy {
    client: TomorrowClient,
    cache: FreshnessCache,
    latch: RateLimitLatch,
    notifier: Option<Notifier>,
}

impl WeatherProxy {
    /// Create a proxy around a configured client.
    #[must_use]
    pub fn new(client: TomorrowClient, freshness: Duration, notifier: Option<Notifier>) -> Self {
        Self {
            client,
            cache: FreshnessCache::new(freshness),
            latch: RateLimitLatch::new(),
            notifier,
        }
    }

    /// Build a proxy from startup configuration, with default endpoint,
    /// query, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::MissingConfig`] for an absent API key, or an
    /// error from constructing the HTTP clients.
    pub fn from_config(config: &Config) -> Result<Self, ProxyError> {
        let client = TomorrowClient::builder().api_key(&config.api_key).build()?;
        let notifier = config.webhook_url.clone().map(Notifier::new).transpose()?;
        Ok(Self::new(client, config.freshness, notifier))
    }

    /// Handle one `GET /weather` request.
    ///
    /// Cache hit, fresh fetch, and stale fallback all resolve to a
    /// [`WeatherReply`] with status 200. Everything else maps to a
    /// [`ServeError`] carrying the status code and description.
    ///
    /// # Errors
    ///
    /// [`ServeError::RateLimited`] when retries were exhausted on 429 and no
    /// payload was ever cached; [`ServeError::UpstreamFailed`] for any other
    /// upstream failure. Stale data is only consulted on the rate-limit path.
    pub async fn get_weather(&self) -> Result<WeatherReply, ServeError> {
        if let Some(entry) = self.cache.read(Instant::now()).await {
            debug!("returning cached data");
            return Ok(WeatherReply {
                body: entry.data,
                source: ReplySource::Cache,
            });
        }

        match timelines::fetch_timelines(&self.client, &self.latch, self.notifier.as_ref()).await {
            Ok(payload) => {
                self.latch.reset();
                self.cache.write(payload.clone(), Instant::now()).await;
                info!("fetched fresh data from Tomorrow.io");
                Ok(WeatherReply {
                    body: payload,
                    source: ReplySource::Upstream,
                })
            }
            Err(ProxyError::RateLimitExhausted { attempts }) => {
                match self.cache.read_stale().await {
                    Some(entry) => {
                        warn!(attempts, "rate limited; serving stale data");
                        Ok(WeatherReply {
                            body: annotate_stale(entry.data),
                            source: ReplySource::Stale,
                        })
                    }
                    None => {
                        error!(attempts, "rate limited with no cached data to fall back on");
                        Err(ServeError::RateLimited)
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "error fetching data from Tomorrow.io");
                Err(ServeError::UpstreamFailed)
            }
        }
    }
}

/// Marks a cached payload as a stale fallback for a rate-limited request.
fn annotate_stale(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        map.insert("stale_data_returned".into(), Value::Bool(true));
        map.insert("error_code".into(), Value::from(429));
    }
    body
}
