use chrono::{DateTime, NaiveDate, Utc};

use crate::{RaceId, Season};

/// One scheduled round of a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    pub season: Season,
    pub round: u32,
    pub date: NaiveDate,
    /// Lights-out time. Older seasons only publish a date.
    pub start_time: Option<DateTime<Utc>>,
}

impl Race {
    /// True when the race day is today or later.
    #[must_use]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }
}

/// Final classification of a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceResults {
    pub season: Season,
    pub round: u32,
    pub race_date: NaiveDate,
    /// `classification[i]` finished in position `i + 1`.
    pub classification: Vec<String>,
}

impl RaceResults {
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.classification.first().map(String::as_str)
    }

    #[must_use]
    pub fn podium(&self) -> &[String] {
        let end = self.classification.len().min(3);
        &self.classification[..end]
    }
}
