//! Core domain types for pickem.
//!
//! Pure data with no IO and no async: seasons, races, results, leagues, and
//! the rendering preferences shared by the engine and the TUI.

mod ids;
mod league;
mod race;
mod season;
mod text;
mod ui;

pub use ids::{LeagueId, RaceId};
pub use league::League;
pub use race::{Race, RaceResults};
pub use season::{FIRST_SEASON, LAST_SEASON, Season, SeasonError};
pub use text::{display_text, truncate_with_ellipsis};
pub use ui::UiOptions;
