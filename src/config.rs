//! Process-wide configuration, read from the environment once at startup.

use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::core::ProxyError;

/// Environment variable holding the Tomorrow.io API key. Required.
pub const ENV_API_KEY: &str = "TOMORROW_API_KEY";

/// Environment variable overriding the cache freshness window, in seconds.
pub const ENV_CACHE_DURATION: &str = "CACHE_DURATION";

/// Environment variable holding the Discord webhook URL. Optional; absence
/// disables rate-limit notifications.
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";

const DEFAULT_FRESHNESS_SECS: u64 = 360;

/// Immutable startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tomorrow.io API key.
    pub api_key: String,
    /// How long a cached payload is served without contacting the upstream.
    pub freshness: Duration,
    /// Webhook for rate-limit notifications, if configured.
    pub webhook_url: Option<Url>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::MissingConfig`] if `TOMORROW_API_KEY` is unset
    /// or empty; this is a fatal startup condition, not a per-request error.
    /// A malformed `DISCORD_WEBHOOK_URL` is rejected as [`ProxyError::Url`]
    /// rather than silently dropped.
    pub fn from_env() -> Result<Self, ProxyError> {
        let api_key = env::var(ENV_API_KEY)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ProxyError::MissingConfig(ENV_API_KEY))?;

        let freshness = match env::var(ENV_CACHE_DURATION) {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!(value = %raw, "unparseable {ENV_CACHE_DURATION}; using default");
                    Duration::from_secs(DEFAULT_FRESHNESS_SECS)
                }
            },
            Err(_) => Duration::from_secs(DEFAULT_FRESHNESS_SECS),
        };

        let webhook_url = match env::var(ENV_WEBHOOK_URL) {
            Ok(raw) if !raw.is_empty() => Some(Url::parse(&raw)?),
            _ => None,
        };

        Ok(Self {
            api_key,
            freshness,
            webhook_url,
        })
    }
}
