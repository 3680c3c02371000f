//! Centralized constants for the upstream endpoint and fixed query.

use std::time::Duration;

/// Identifying UA for outbound calls.
pub(crate) const USER_AGENT: &str = concat!("tomorrow-proxy/", env!("CARGO_PKG_VERSION"));

/// Tomorrow.io timelines endpoint.
pub(crate) const DEFAULT_BASE_TIMELINES: &str = "https://api.tomorrow.io/v4/timelines";

/// Geographic coordinate the proxy reports on.
pub(crate) const DEFAULT_LOCATION: &str = "41.3276,-72.7673";

/// One-minute timestep.
pub(crate) const DEFAULT_TIMESTEPS: &str = "1m";

/// Imperial units.
pub(crate) const DEFAULT_UNITS: &str = "imperial";

/// Data fields requested from the upstream.
pub(crate) const DEFAULT_FIELDS: &str = "temperature,weatherCode";

/// Per-attempt request timeout; an upstream hang must not stall a request.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
