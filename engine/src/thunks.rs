//! Action creators that fetch data.
//!
//! Each creator returns a [`Dispatchable`] thunk. The synchronous part marks
//! the slice as loading, the spawned part calls the provider and dispatches
//! the outcome. Provider errors end up in state, never in the caller.

use std::future;

use chrono::NaiveDate;

use pickem_types::{Race, Season};

use crate::{Action, Dispatchable, Thunk};

pub fn get_leagues() -> Dispatchable {
    Thunk::new(|store| {
        store.dispatch(Action::LeaguesRequested);
        let store = store.clone();
        Box::pin(async move {
            let services = store.services();
            match services.leagues.leagues(services.user_id.as_deref()).await {
                Ok(leagues) => {
                    tracing::info!(count = leagues.len(), "leagues loaded");
                    store.dispatch(Action::LeaguesLoaded(leagues));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to load leagues");
                    store.dispatch(Action::LeaguesFailed(err.to_string()));
                }
            }
        })
    })
    .into()
}

pub fn get_races(season: Season) -> Dispatchable {
    Thunk::new(move |store| {
        store.dispatch(Action::RacesRequested(season));
        let store = store.clone();
        Box::pin(async move {
            let services = store.services();
            match services.races.races(season).await {
                Ok(races) => {
                    tracing::info!(%season, count = races.len(), "race schedule loaded");
                    let focus = focus_index(&races, services.clock.today());
                    store.dispatch(Action::RacesLoaded { season, races });
                    if let Some(index) = focus
                        && index > 0
                        && store.read(|state| state.season == Some(season))
                    {
                        store.dispatch(Action::SelectRace(index));
                    }
                }
                Err(err) => {
                    tracing::warn!(%season, error = %err, "failed to load race schedule");
                    store.dispatch(Action::RacesFailed {
                        season,
                        error: err.to_string(),
                    });
                }
            }
        })
    })
    .into()
}

/// Fetch results for `race` unless they are loaded or already in flight.
pub fn get_race_results(race: &Race) -> Dispatchable {
    let id = race.id.clone();
    let season = race.season;
    let round = race.round;
    Thunk::new(move |store| {
        let pending = store.read(|state| {
            let entry = state.results_for(&id);
            entry.is_loading() || entry.loaded().is_some()
        });
        if pending {
            tracing::debug!(race = %id, "results already requested");
            return Box::pin(future::ready(()));
        }

        store.dispatch(Action::ResultsRequested(id.clone()));
        let store = store.clone();
        Box::pin(async move {
            match store.services().races.race_results(season, round).await {
                Ok(results) => {
                    tracing::info!(
                        race = %id,
                        published = results.is_some(),
                        "race results loaded"
                    );
                    store.dispatch(Action::ResultsLoaded { race: id, results });
                }
                Err(err) => {
                    tracing::warn!(race = %id, error = %err, "failed to load race results");
                    store.dispatch(Action::ResultsFailed {
                        race: id,
                        error: err.to_string(),
                    });
                }
            }
        })
    })
    .into()
}

/// Re-fetch everything shown at startup.
pub fn refresh(season: Season) -> [Dispatchable; 2] {
    [get_leagues(), get_races(season)]
}

/// Race to focus once a schedule arrives: the next one still to run, or the
/// last one when the season is over.
#[must_use]
pub fn focus_index(races: &[Race], today: NaiveDate) -> Option<usize> {
    races
        .iter()
        .position(|race| race.is_upcoming(today))
        .or_else(|| races.len().checked_sub(1))
}
