//! Fakes shared by the engine's unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use pickem_providers::{FixtureLeagues, ProviderError, ProviderFut, RaceDataClient};
use pickem_types::{Race, RaceId, RaceResults, Season};

use crate::{FixedClock, Services};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn race(year: i32, round: u32, date: NaiveDate) -> Race {
    let season = Season::from_year(year).unwrap();
    Race {
        id: RaceId::new(season, round),
        name: format!("Grand Prix {round}"),
        season,
        round,
        date,
        start_time: None,
    }
}

pub(crate) fn podium(year: i32, round: u32) -> RaceResults {
    RaceResults {
        season: Season::from_year(year).unwrap(),
        round,
        race_date: date(year, 3, 20),
        classification: vec![
            "Charles Leclerc".to_string(),
            "Carlos Sainz".to_string(),
            "Lewis Hamilton".to_string(),
        ],
    }
}

/// Schedules keyed by year and results keyed by round. Anything missing
/// fails like a server error would.
#[derive(Default)]
pub(crate) struct FakeRaces {
    schedules: HashMap<u16, Vec<Race>>,
    results: HashMap<u32, Option<RaceResults>>,
    pub(crate) race_calls: AtomicUsize,
    pub(crate) result_calls: AtomicUsize,
}

impl FakeRaces {
    pub(crate) fn with_schedule(mut self, races: Vec<Race>) -> Self {
        if let Some(first) = races.first() {
            self.schedules.insert(first.season.year(), races);
        }
        self
    }

    pub(crate) fn with_results(mut self, round: u32, results: Option<RaceResults>) -> Self {
        self.results.insert(round, results);
        self
    }
}

impl RaceDataClient for FakeRaces {
    fn races(&self, season: Season) -> ProviderFut<'_, Vec<Race>> {
        self.race_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .schedules
            .get(&season.year())
            .cloned()
            .ok_or_else(|| ProviderError::Unexpected(format!("no schedule for {season}")));
        Box::pin(async move { outcome })
    }

    fn race_results(&self, season: Season, round: u32) -> ProviderFut<'_, Option<RaceResults>> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.results.get(&round).cloned().ok_or_else(|| {
            ProviderError::Unexpected(format!("no results for {season} round {round}"))
        });
        Box::pin(async move { outcome })
    }
}

pub(crate) fn services_with(races: FakeRaces, today: NaiveDate) -> Services {
    Services {
        races: Arc::new(races),
        leagues: Arc::new(FixtureLeagues::default()),
        user_id: None,
        clock: Arc::new(FixedClock(today)),
    }
}

pub(crate) fn services() -> Services {
    services_with(FakeRaces::default(), date(2022, 4, 1))
}
