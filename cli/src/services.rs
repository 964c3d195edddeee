//! Data sources selected by the config file.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use pickem_config::PickemConfig;
use pickem_engine::{Services, SystemClock};
use pickem_providers::{
    ErgastClient, FixtureLeagues, LeagueSource, PickemApi, RetryConfig, http_client,
};

pub fn build_services(config: &PickemConfig) -> Result<Services> {
    let timeout = Duration::from_secs(config.ergast.timeout_seconds);
    let http = http_client(timeout).context("failed to build HTTP client")?;
    let retry = RetryConfig::with_max_retries(config.ergast.max_retries);

    let races = ErgastClient::new(config.ergast.base_url.clone(), http.clone())
        .with_retry(retry.clone())
        .with_grid_size(config.ergast.grid_size);

    let leagues: Arc<dyn LeagueSource> = match &config.api.base_url {
        Some(base_url) => {
            tracing::info!(base_url = %base_url, "using pick'em API for leagues");
            Arc::new(PickemApi::new(base_url.clone(), http).with_retry(retry))
        }
        None => {
            tracing::info!("no pick'em API configured; using built-in leagues");
            Arc::new(FixtureLeagues::default())
        }
    };

    Ok(Services {
        races: Arc::new(races),
        leagues,
        user_id: config.api.user_id.clone(),
        clock: Arc::new(SystemClock),
    })
}
