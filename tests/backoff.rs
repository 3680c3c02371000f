mod common;

use std::time::Duration;

use tomorrow_proxy::core::fetch_timelines;
use tomorrow_proxy::{Backoff, ProxyError, RateLimitLatch, RetryConfig, TomorrowClient};
use url::Url;

#[test]
fn exponential_delays_double_and_cap() {
    let backoff = Backoff::Exponential {
        base: Duration::from_millis(100),
        factor: 2.0,
        max: Duration::from_millis(450),
        jitter: Duration::ZERO,
    };

    let delays: Vec<_> = (0..5).map(|attempt| backoff.delay_for(attempt)).collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(450),
            Duration::from_millis(450),
        ]
    );
}

#[test]
fn fixed_delay_is_constant() {
    let backoff = Backoff::Fixed(Duration::from_millis(25));
    assert_eq!(backoff.delay_for(0), Duration::from_millis(25));
    assert_eq!(backoff.delay_for(7), Duration::from_millis(25));
}

#[test]
fn successive_delays_never_shrink() {
    let backoff = RetryConfig::default().backoff;
    let mut prev = backoff.delay_for(0);
    for attempt in 1..8 {
        let next = backoff.delay_for(attempt);
        assert!(next >= prev, "delay shrank at attempt {attempt}");
        prev = next;
    }
}

#[tokio::test]
async fn stops_after_the_retry_ceiling_on_429() {
    let server = common::setup_server();
    let limited = common::mock_timelines_status(&server, 429);
    let client = common::test_client(&server, 4);
    let latch = RateLimitLatch::new();

    let err = fetch_timelines(&client, &latch, None).await.unwrap_err();
    limited.assert_calls(4);

    match err {
        ProxyError::RateLimitExhausted { attempts } => assert_eq!(attempts, 4),
        other => panic!("expected RateLimitExhausted, got {other:?}"),
    }
    assert!(latch.is_notified());
}

#[tokio::test]
async fn success_short_circuits_remaining_attempts() {
    let server = common::setup_server();
    let mock = common::mock_timelines_ok(&server);
    let client = common::test_client(&server, 5);
    let latch = RateLimitLatch::new();

    let payload = fetch_timelines(&client, &latch, None).await.unwrap();
    mock.assert();
    assert_eq!(payload, common::sample_payload());
    assert!(!latch.is_notified());
}

#[tokio::test]
async fn non_rate_limit_status_fails_without_retry() {
    let server = common::setup_server();
    let broken = common::mock_timelines_status(&server, 503);
    let client = common::test_client(&server, 5);
    let latch = RateLimitLatch::new();

    let err = fetch_timelines(&client, &latch, None).await.unwrap_err();
    broken.assert();

    match err {
        ProxyError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.contains("/v4/timelines"));
            // The endpoint in the error carries no query string, so no key.
            assert!(!url.contains("apikey"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
    assert!(!latch.is_notified());
}

#[tokio::test]
async fn transport_errors_exhaust_to_fetch_failed() {
    // Nothing listens on the discard port; every attempt dies at connect.
    let client = TomorrowClient::builder()
        .api_key(common::TEST_API_KEY)
        .base_timelines(Url::parse("http://127.0.0.1:9/v4/timelines").unwrap())
        .retry(common::fast_retry(3))
        .connect_timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let latch = RateLimitLatch::new();

    let err = fetch_timelines(&client, &latch, None).await.unwrap_err();

    match err {
        ProxyError::FetchFailed { attempts } => assert_eq!(attempts, 3),
        other => panic!("expected FetchFailed, got {other:?}"),
    }
    // Transport failures alone never count as a rate-limit episode.
    assert!(!latch.is_notified());
}
