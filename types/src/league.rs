use crate::{LeagueId, Season};

/// A pick'em league the user belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub member_count: u32,
    pub season: Season,
}
