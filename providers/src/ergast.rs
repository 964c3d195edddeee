//! Ergast-compatible race data client.
//!
//! Endpoints:
//! - `GET {base}/api/f1/{season}.json` - season schedule
//! - `GET {base}/api/f1/{season}/{round}/results.json` - race classification

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use pickem_types::{Race, RaceId, RaceResults, Season};

use crate::retry::RetryConfig;
use crate::{ProviderError, ProviderFut, get_json, trim_base_url};

/// Classified finishers expected in a complete result set.
pub const DEFAULT_GRID_SIZE: usize = 20;

pub trait RaceDataClient: Send + Sync {
    /// Season schedule in round order. Empty when the season has no races yet.
    fn races(&self, season: Season) -> ProviderFut<'_, Vec<Race>>;

    /// Classification for one round. `None` until results are published.
    fn race_results(&self, season: Season, round: u32) -> ProviderFut<'_, Option<RaceResults>>;
}

#[derive(Debug, Clone)]
pub struct ErgastClient {
    base_url: String,
    http: reqwest::Client,
    retry: RetryConfig,
    grid_size: usize,
}

impl ErgastClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: trim_base_url(base_url),
            http,
            retry: RetryConfig::default(),
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    fn schedule_url(&self, season: Season) -> String {
        format!("{}/api/f1/{season}.json", self.base_url)
    }

    fn results_url(&self, season: Season, round: u32) -> String {
        format!("{}/api/f1/{season}/{round}/results.json", self.base_url)
    }

    async fn fetch_races(&self, season: Season) -> Result<Vec<Race>, ProviderError> {
        tracing::info!(%season, "fetching races");
        let url = self.schedule_url(season);
        let response: ScheduleResponse =
            get_json(&url, || self.http.get(&url), &self.retry).await?;
        parse_schedule(season, response.data)
    }

    async fn fetch_results(
        &self,
        season: Season,
        round: u32,
    ) -> Result<Option<RaceResults>, ProviderError> {
        tracing::info!(%season, round, "fetching race results");
        let url = self.results_url(season, round);
        let response: ResultsResponse =
            get_json(&url, || self.http.get(&url), &self.retry).await?;
        parse_results(season, round, self.grid_size, response.data)
    }
}

impl RaceDataClient for ErgastClient {
    fn races(&self, season: Season) -> ProviderFut<'_, Vec<Race>> {
        Box::pin(self.fetch_races(season))
    }

    fn race_results(&self, season: Season, round: u32) -> ProviderFut<'_, Option<RaceResults>> {
        Box::pin(self.fetch_results(season, round))
    }
}

// Wire format. Ergast encodes every scalar as a string.

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(rename = "MRData")]
    data: ScheduleData,
}

#[derive(Debug, Deserialize)]
struct ScheduleData {
    #[serde(default)]
    limit: String,
    #[serde(default)]
    total: String,
    #[serde(rename = "RaceTable")]
    race_table: RaceTable<ScheduledRace>,
}

#[derive(Debug, Deserialize)]
struct RaceTable<R> {
    #[serde(rename = "Races", default = "Vec::new")]
    races: Vec<R>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduledRace {
    season: String,
    round: String,
    race_name: String,
    date: String,
    #[serde(default)]
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    #[serde(rename = "MRData")]
    data: ResultsData,
}

#[derive(Debug, Deserialize)]
struct ResultsData {
    #[serde(rename = "RaceTable")]
    race_table: RaceTable<ClassifiedRace>,
}

#[derive(Debug, Deserialize)]
struct ClassifiedRace {
    date: String,
    #[serde(rename = "Results", default)]
    results: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    position: String,
    #[serde(rename = "Driver")]
    driver: Driver,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Driver {
    given_name: String,
    family_name: String,
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, ProviderError> {
    raw.trim()
        .parse()
        .map_err(|_| ProviderError::invalid(field, raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ProviderError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ProviderError::invalid("race date", raw))
}

fn parse_start_time(date: &str, time: &str) -> Result<DateTime<Utc>, ProviderError> {
    let stamp = format!("{}T{}", date.trim(), time.trim());
    DateTime::parse_from_rfc3339(&stamp)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ProviderError::invalid("race start time", stamp))
}

fn parse_schedule(requested: Season, data: ScheduleData) -> Result<Vec<Race>, ProviderError> {
    if data.race_table.races.is_empty() {
        return Ok(Vec::new());
    }

    let total = parse_count("total", &data.total)?;
    let limit = parse_count("limit", &data.limit)?;
    if total > limit {
        tracing::warn!(season = %requested, total, limit, "unhandled paginated race schedule");
        return Err(ProviderError::Paginated {
            season: requested,
            total,
            limit,
        });
    }

    data.race_table
        .races
        .into_iter()
        .map(|race| {
            let season = Season::parse(&race.season)
                .map_err(|_| ProviderError::invalid("season", &race.season))?;
            let round = parse_count("race round", &race.round)?;
            let date = parse_date(&race.date)?;
            let start_time = match race.time.as_deref().map(str::trim) {
                Some(time) if !time.is_empty() => Some(parse_start_time(&race.date, time)?),
                _ => None,
            };
            Ok(Race {
                id: RaceId::new(season, round),
                name: race.race_name,
                season,
                round,
                date,
                start_time,
            })
        })
        .collect()
}

fn parse_results(
    season: Season,
    round: u32,
    grid_size: usize,
    data: ResultsData,
) -> Result<Option<RaceResults>, ProviderError> {
    let mut races = data.race_table.races;
    // Results that are not published yet come back as an empty table.
    let race = match races.len() {
        0 => return Ok(None),
        1 => races.remove(0),
        n => {
            tracing::error!(%season, round, races = n, "unexpected number of races");
            return Err(ProviderError::Unexpected(format!(
                "expected 1 race for {season} round {round}, got {n}"
            )));
        }
    };

    // ...or as a race with no results.
    if race.results.is_empty() {
        return Ok(None);
    }

    if race.results.len() != grid_size {
        tracing::error!(
            %season,
            round,
            results = race.results.len(),
            "unexpected number of race results"
        );
        return Err(ProviderError::Unexpected(format!(
            "expected {grid_size} race results, got {}",
            race.results.len()
        )));
    }

    let race_date = parse_date(&race.date)?;
    let mut classification = vec![String::new(); grid_size];
    for entry in race.results {
        let position: usize = entry
            .position
            .trim()
            .parse()
            .map_err(|_| ProviderError::invalid("position", &entry.position))?;
        if !(1..=grid_size).contains(&position) {
            return Err(ProviderError::invalid("position", entry.position));
        }

        let slot = &mut classification[position - 1];
        if !slot.is_empty() {
            return Err(ProviderError::Unexpected(format!(
                "position {position} classified twice"
            )));
        }
        *slot = format!("{} {}", entry.driver.given_name, entry.driver.family_name);
    }

    Ok(Some(RaceResults {
        season,
        round,
        race_date,
        classification,
    }))
}
