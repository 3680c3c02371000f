//! tomorrow-proxy: caching proxy core for the Tomorrow.io timelines API.
//!
//! Fronts a single fixed upstream query with a one-slot freshness cache, an
//! exponential-backoff retry loop for rate-limited responses, and a
//! best-effort stale-data fallback when every retry is consumed. The HTTP
//! server mounting [`WeatherProxy::get_weather`] is left to the embedding
//! application; this crate only produces status codes and JSON bodies.

pub mod config;
pub mod core;
pub mod notify;
pub mod proxy;

pub use crate::config::Config;
pub use crate::core::{
    Backoff, CacheEntry, FreshnessCache, ProxyError, RetryConfig, TomorrowClient,
    TomorrowClientBuilder,
};
pub use crate::notify::{Notifier, RateLimitLatch};
pub use crate::proxy::{ReplySource, ServeError, WeatherProxy, WeatherReply};
