#![allow(dead_code)]

use std::time::Duration;

use httpmock::{Method::GET, Mock, MockServer};
use serde_json::{Value, json};
use tomorrow_proxy::{Backoff, RetryConfig, TomorrowClient};
use url::Url;

pub const TEST_API_KEY: &str = "test-key";

pub fn setup_server() -> MockServer {
    MockServer::start()
}

/// A minimal timelines payload in the upstream's envelope shape.
pub fn sample_payload() -> Value {
    json!({
        "data": {
            "timelines": [{
                "timestep": "1m",
                "startTime": "2025-03-23T12:00:00Z",
                "endTime": "2025-03-23T12:01:00Z",
                "intervals": [{
                    "startTime": "2025-03-23T12:00:00Z",
                    "values": { "temperature": 42.0, "weatherCode": 1000 }
                }]
            }]
        }
    })
}

/// Millisecond-scale retry policy so backoff tests finish quickly.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff: Backoff::Exponential {
            base: Duration::from_millis(2),
            factor: 2.0,
            max: Duration::from_millis(10),
            jitter: Duration::ZERO,
        },
    }
}

pub fn test_client(server: &MockServer, max_retries: u32) -> TomorrowClient {
    TomorrowClient::builder()
        .api_key(TEST_API_KEY)
        .base_timelines(Url::parse(&format!("{}/v4/timelines", server.base_url())).unwrap())
        .retry(fast_retry(max_retries))
        .build()
        .unwrap()
}

/// Mocks a successful timelines response; also checks the fixed query.
pub fn mock_timelines_ok(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/v4/timelines")
            .query_param("apikey", TEST_API_KEY)
            .query_param("location", "41.3276,-72.7673")
            .query_param("timesteps", "1m")
            .query_param("units", "imperial")
            .query_param("fields", "temperature,weatherCode");
        then.status(200)
            .header("content-type", "application/json")
            .body(sample_payload().to_string());
    })
}

/// Mocks the timelines endpoint answering every call with `status`.
pub fn mock_timelines_status(server: &MockServer, status: u16) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/v4/timelines");
        then.status(status)
            .header("content-type", "application/json")
            .body(r#"{"message":"upstream unhappy"}"#);
    })
}
