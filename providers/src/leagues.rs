//! Leagues the current user belongs to.
//!
//! [`PickemApi`] talks to the pick'em backend (`GET {base}/leagues`).
//! [`FixtureLeagues`] serves a fixed list when no backend is configured.

use serde::Deserialize;

use pickem_types::{League, LeagueId, Season};

use crate::retry::RetryConfig;
use crate::{ProviderError, ProviderFut, get_json, trim_base_url};

pub trait LeagueSource: Send + Sync {
    fn leagues<'a>(&'a self, user_id: Option<&'a str>) -> ProviderFut<'a, Vec<League>>;
}

#[derive(Debug, Clone)]
pub struct PickemApi {
    base_url: String,
    http: reqwest::Client,
    retry: RetryConfig,
}

impl PickemApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            http,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch(&self, user_id: Option<&str>) -> Result<Vec<League>, ProviderError> {
        tracing::info!(user_id, "fetching leagues");
        let url = format!("{}/leagues", self.base_url);
        let response: LeaguesResponse = get_json(
            &url,
            || {
                let request = self.http.get(&url);
                match user_id {
                    Some(id) => request.query(&[("userId", id)]),
                    None => request,
                }
            },
            &self.retry,
        )
        .await?;

        response.leagues.into_iter().map(LeagueRecord::into_league).collect()
    }
}

impl LeagueSource for PickemApi {
    fn leagues<'a>(&'a self, user_id: Option<&'a str>) -> ProviderFut<'a, Vec<League>> {
        Box::pin(self.fetch(user_id))
    }
}

/// In-memory leagues, used offline and in tests.
#[derive(Debug, Clone)]
pub struct FixtureLeagues {
    leagues: Vec<League>,
}

impl FixtureLeagues {
    #[must_use]
    pub fn new(leagues: Vec<League>) -> Self {
        Self { leagues }
    }
}

impl Default for FixtureLeagues {
    /// The single league every new user starts in.
    fn default() -> Self {
        Self::new(vec![League {
            id: LeagueId::new("1"),
            name: "Fast Boiz".to_string(),
            member_count: 11,
            season: Season::clamped(2022),
        }])
    }
}

impl LeagueSource for FixtureLeagues {
    fn leagues<'a>(&'a self, _user_id: Option<&'a str>) -> ProviderFut<'a, Vec<League>> {
        let leagues = self.leagues.clone();
        Box::pin(async move { Ok(leagues) })
    }
}

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    #[serde(default)]
    leagues: Vec<LeagueRecord>,
}

#[derive(Debug, Deserialize)]
struct LeagueRecord {
    id: String,
    name: String,
    num_of_members: u32,
    season: String,
}

impl LeagueRecord {
    fn into_league(self) -> Result<League, ProviderError> {
        if self.id.trim().is_empty() {
            return Err(ProviderError::invalid("league id", self.id));
        }
        let season = Season::parse(&self.season)
            .map_err(|_| ProviderError::invalid("league season", &self.season))?;
        Ok(League {
            id: LeagueId::new(self.id),
            name: self.name,
            member_count: self.num_of_members,
            season,
        })
    }
}
