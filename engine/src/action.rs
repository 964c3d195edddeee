//! Actions and the reducer that applies them.

use pickem_types::{League, Race, RaceId, RaceResults, Season};

use crate::{AppState, Remote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LeaguesRequested,
    LeaguesLoaded(Vec<League>),
    LeaguesFailed(String),
    RacesRequested(Season),
    RacesLoaded { season: Season, races: Vec<Race> },
    RacesFailed { season: Season, error: String },
    ResultsRequested(RaceId),
    ResultsLoaded {
        race: RaceId,
        results: Option<RaceResults>,
    },
    ResultsFailed { race: RaceId, error: String },
    SelectRace(usize),
    SelectNext,
    SelectPrevious,
}

impl Action {
    /// Short label for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LeaguesRequested => "leagues/requested",
            Self::LeaguesLoaded(_) => "leagues/loaded",
            Self::LeaguesFailed(_) => "leagues/failed",
            Self::RacesRequested(_) => "races/requested",
            Self::RacesLoaded { .. } => "races/loaded",
            Self::RacesFailed { .. } => "races/failed",
            Self::ResultsRequested(_) => "results/requested",
            Self::ResultsLoaded { .. } => "results/loaded",
            Self::ResultsFailed { .. } => "results/failed",
            Self::SelectRace(_) => "race/select",
            Self::SelectNext => "race/next",
            Self::SelectPrevious => "race/previous",
        }
    }
}

/// Apply `action` to `state`. Pure: no IO, no clock.
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::LeaguesRequested => state.leagues = Remote::Loading,
        Action::LeaguesLoaded(leagues) => state.leagues = Remote::Loaded(leagues),
        Action::LeaguesFailed(error) => state.leagues = Remote::Failed(error),

        Action::RacesRequested(season) => {
            state.season = Some(season);
            state.races = Remote::Loading;
            state.selected_race = None;
        }
        Action::RacesLoaded { season, races } => {
            if state.season != Some(season) {
                tracing::debug!(%season, "dropping stale race schedule");
                return;
            }
            state.selected_race = if races.is_empty() { None } else { Some(0) };
            state.races = Remote::Loaded(races);
        }
        Action::RacesFailed { season, error } => {
            if state.season != Some(season) {
                tracing::debug!(%season, "dropping stale race failure");
                return;
            }
            state.selected_race = None;
            state.races = Remote::Failed(error);
        }

        Action::ResultsRequested(race) => {
            state.results.insert(race, Remote::Loading);
        }
        Action::ResultsLoaded { race, results } => {
            state.results.insert(race, Remote::Loaded(results));
        }
        Action::ResultsFailed { race, error } => {
            state.results.insert(race, Remote::Failed(error));
        }

        Action::SelectRace(index) => {
            let len = state.schedule().len();
            if len > 0 {
                state.selected_race = Some(index.min(len - 1));
            }
        }
        Action::SelectNext => {
            let len = state.schedule().len();
            if let Some(current) = state.selected_race
                && current + 1 < len
            {
                state.selected_race = Some(current + 1);
            }
        }
        Action::SelectPrevious => {
            if let Some(current) = state.selected_race {
                state.selected_race = Some(current.saturating_sub(1));
            }
        }
    }
}
