//! Fetch loop for the Tomorrow.io timelines endpoint.
//!
//! Rate-limited (429) and transport-failed attempts share one retry loop with
//! exponential backoff; any other non-success status aborts immediately.

use reqwest::StatusCode;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::core::{ProxyError, client::TomorrowClient};
use crate::notify::{Notifier, RateLimitLatch};

/// Message dispatched to the webhook when an episode starts.
pub(crate) const RATE_LIMIT_MESSAGE: &str = "Rate-limited by Tomorrow.io";

/// Calls the timelines endpoint until it succeeds or retries are exhausted.
///
/// A 429 claims `latch`; the first claim of an episode dispatches a single
/// notification through `notifier`. Transport errors take the same backoff
/// sleeps but never touch the latch. The latch is not reset here; that is the
/// caller's job once it has processed the successful payload.
///
/// # Errors
///
/// Returns [`ProxyError::RateLimitExhausted`] when every attempt was consumed
/// and at least one was answered with 429, [`ProxyError::FetchFailed`] when
/// attempts ran out on transport errors alone, and [`ProxyError::Status`]
/// immediately on any other non-success status.
pub async fn fetch_timelines(
    client: &TomorrowClient,
    latch: &RateLimitLatch,
    notifier: Option<&Notifier>,
) -> Result<Value, ProxyError> {
    let retry = client.retry();
    let url = client.timelines_url();

    let mut rate_limited = false;
    for attempt in 0..retry.max_retries {
        let last = attempt + 1 == retry.max_retries;

        match client.http().get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(attempt, "timelines fetch succeeded");
                return Ok(resp.json().await?);
            }
            Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
                rate_limited = true;
                if latch.claim() {
                    match notifier {
                        Some(n) => n.dispatch(RATE_LIMIT_MESSAGE),
                        None => debug!("no webhook configured; skipping rate-limit notification"),
                    }
                }
                if !last {
                    let delay = retry.backoff.jittered(attempt);
                    warn!(attempt, ?delay, "rate limited by Tomorrow.io; backing off");
                    sleep(delay).await;
                }
            }
            Ok(resp) => {
                return Err(ProxyError::Status {
                    status: resp.status().as_u16(),
                    url: client.endpoint().to_string(),
                });
            }
            Err(e) => {
                warn!(attempt, error = %e, "transport error reaching Tomorrow.io");
                if !last {
                    sleep(retry.backoff.jittered(attempt)).await;
                }
            }
        }
    }

    if rate_limited {
        Err(ProxyError::RateLimitExhausted {
            attempts: retry.max_retries,
        })
    } else {
        Err(ProxyError::FetchFailed {
            attempts: retry.max_retries,
        })
    }
}
