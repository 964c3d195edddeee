//! Application state held by the store.

use std::collections::BTreeMap;

use pickem_types::{League, Race, RaceId, RaceResults, Season};

use crate::Remote;

/// Everything the UI renders. Only the reducer mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub leagues: Remote<Vec<League>>,
    /// Season whose schedule is shown or being fetched.
    pub season: Option<Season>,
    pub races: Remote<Vec<Race>>,
    /// Index into the loaded schedule.
    pub selected_race: Option<usize>,
    pub results: BTreeMap<RaceId, Remote<Option<RaceResults>>>,
}

impl AppState {
    #[must_use]
    pub fn schedule(&self) -> &[Race] {
        self.races.loaded().map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Race> {
        self.selected_race.and_then(|i| self.schedule().get(i))
    }

    #[must_use]
    pub fn results_for(&self, race: &RaceId) -> &Remote<Option<RaceResults>> {
        const IDLE: &Remote<Option<RaceResults>> = &Remote::Idle;
        self.results.get(race).unwrap_or(IDLE)
    }

    /// Both startup fetches have completed, successfully or not.
    #[must_use]
    pub fn first_data_settled(&self) -> bool {
        self.leagues.is_settled() && self.races.is_settled()
    }
}
