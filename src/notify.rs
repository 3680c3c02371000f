//! Rate-limit episode latch and webhook notification dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::core::ProxyError;

/// Outbound webhook calls get their own, shorter timeout.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// One-shot latch ensuring at most one notification per rate-limit episode.
///
/// An episode is an unbroken run of 429 responses from the upstream; it ends
/// at the next successful fetch, when the handler calls [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct RateLimitLatch {
    notified: AtomicBool,
}

impl RateLimitLatch {
    /// Create a latch in the un-notified state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the right to notify for the current episode.
    ///
    /// Check and set are a single compare-exchange, so under concurrent
    /// requests at most one caller wins the claim.
    pub fn claim(&self) -> bool {
        self.notified
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether a notification has been dispatched for the current episode.
    pub fn is_notified(&self) -> bool {
        self.notified.load(Ordering::Acquire)
    }

    /// Ends the episode. Idempotent; called after any successful fetch.
    pub fn reset(&self) {
        self.notified.store(false, Ordering::Release);
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Fire-and-forget webhook messenger for rate-limit events.
///
/// Delivery runs on a spawned task; failures are logged and discarded so the
/// request being served is never affected.
#[derive(Clone)]
pub struct Notifier {
    http: reqwest::Client,
    url: Url,
}

impl Notifier {
    /// Create a notifier posting to the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(url: Url) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self { http, url })
    }

    /// Sends `message` without blocking the caller beyond spawning the task.
    pub fn dispatch(&self, message: &str) {
        let req = self
            .http
            .post(self.url.clone())
            .json(&WebhookPayload { content: message });

        tokio::spawn(async move {
            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("rate-limit notification delivered");
                }
                Ok(resp) => {
                    warn!(
                        status = resp.status().as_u16(),
                        "webhook rejected rate-limit notification"
                    );
                }
                Err(e) => warn!(error = %e, "failed to deliver rate-limit notification"),
            }
        });
    }
}

// Webhook URLs embed a secret token; keep them out of Debug output.
impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}
