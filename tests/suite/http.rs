//! Retry behaviour of the HTTP clients.

use std::time::Duration;

use pickem_providers::retry::RETRY_COUNT_HEADER;
use pickem_providers::{ErgastClient, ProviderError, RaceDataClient, RetryConfig};
use pickem_types::Season;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::schedule_body;

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        jitter_factor: 0.0,
    }
}

fn client(server: &MockServer, retry: RetryConfig) -> ErgastClient {
    ErgastClient::new(server.uri(), reqwest::Client::new()).with_retry(retry)
}

#[tokio::test]
async fn transient_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/f1/2022.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/f1/2022.json"))
        .and(header(RETRY_COUNT_HEADER, "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule_body(
            2022,
            &[(1, "Bahrain Grand Prix", "2022-03-20")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let races = client(&server, fast_retry(2))
        .races(Season::from_year(2022).unwrap())
        .await
        .unwrap();
    assert_eq!(races.len(), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/f1/2022.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, fast_retry(3))
        .races(Season::from_year(2022).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 404, .. }));
}

#[tokio::test]
async fn retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/f1/2022/1/results.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server, fast_retry(2))
        .race_results(Season::from_year(2022).unwrap(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 500, .. }));
}
