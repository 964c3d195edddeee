use std::fmt;

use crate::Season;

/// Key identifying one round of one season, rendered as `"{season}-{round}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RaceId(String);

impl RaceId {
    #[must_use]
    pub fn new(season: Season, round: u32) -> Self {
        Self(format!("{season}-{round}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque league identifier assigned by the pick'em backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeagueId(String);

impl LeagueId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
