//! HTTP clients behind the pick'em store.
//!
//! - [`ergast`] - race schedule and results from an Ergast-compatible API
//! - [`leagues`] - the user's leagues from the pick'em API, or an offline fixture
//! - [`retry`] - exponential backoff shared by both
//!
//! Both data sources are dyn-compatible traits returning boxed futures so
//! the engine can hold them as `Arc<dyn ...>` and tests can swap in fakes.

pub mod ergast;
pub mod leagues;
pub mod retry;

mod error;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

pub use ergast::{ErgastClient, RaceDataClient};
pub use error::ProviderError;
pub use leagues::{FixtureLeagues, LeagueSource, PickemApi};
pub use retry::RetryConfig;

/// Future returned by provider trait methods.
pub type ProviderFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

const USER_AGENT: &str = concat!("pickem/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Shared client for all providers. `timeout` bounds each whole request.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
        .timeout(timeout)
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .user_agent(USER_AGENT)
        .build()
}

/// GET with retries, then decode the JSON body.
pub(crate) async fn get_json<T, F>(
    url: &str,
    build_request: F,
    retry: &RetryConfig,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    F: Fn() -> RequestBuilder,
{
    let response = match retry::send_with_retry(build_request, retry).await {
        retry::RetryOutcome::Success(response) => response,
        retry::RetryOutcome::HttpError(response) => {
            let status = response.status().as_u16();
            tracing::error!(url, status, "request failed");
            return Err(ProviderError::Status {
                url: url.to_string(),
                status,
            });
        }
        retry::RetryOutcome::ConnectionError { attempts, source } => {
            tracing::error!(url, attempts, error = %source, "request failed");
            return Err(ProviderError::Transport {
                url: url.to_string(),
                attempts,
                source,
            });
        }
    };

    let body = response.bytes().await.map_err(|source| {
        tracing::error!(url, error = %source, "unable to read response body");
        ProviderError::Body {
            url: url.to_string(),
            source,
        }
    })?;

    serde_json::from_slice(&body).map_err(|source| {
        tracing::error!(url, error = %source, "unable to parse response body");
        ProviderError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

pub(crate) fn trim_base_url(base_url: impl Into<String>) -> String {
    let mut base = base_url.into();
    while base.ends_with('/') {
        base.pop();
    }
    base
}
