use std::fmt;

use thiserror::Error;

/// First world championship season.
pub const FIRST_SEASON: u16 = 1950;
/// Upper bound accepted for a season year.
pub const LAST_SEASON: u16 = 9999;

/// A championship year.
///
/// Always within `FIRST_SEASON..=LAST_SEASON`, so it is safe to interpolate
/// into API paths without further validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season(u16);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonError {
    #[error("season {0} is outside {FIRST_SEASON}..={LAST_SEASON}")]
    OutOfRange(i64),
    #[error("season '{0}' is not a year")]
    NotAYear(String),
}

impl Season {
    pub fn from_year(year: i32) -> Result<Self, SeasonError> {
        match u16::try_from(year) {
            Ok(y) if (FIRST_SEASON..=LAST_SEASON).contains(&y) => Ok(Self(y)),
            _ => Err(SeasonError::OutOfRange(i64::from(year))),
        }
    }

    /// Nearest valid season to `year`.
    #[must_use]
    pub const fn clamped(year: u16) -> Self {
        if year < FIRST_SEASON {
            Self(FIRST_SEASON)
        } else if year > LAST_SEASON {
            Self(LAST_SEASON)
        } else {
            Self(year)
        }
    }

    /// Parse the string form used by the HTTP APIs (`"2022"`).
    pub fn parse(raw: &str) -> Result<Self, SeasonError> {
        let trimmed = raw.trim();
        let year: i64 = trimmed
            .parse()
            .map_err(|_| SeasonError::NotAYear(trimmed.to_string()))?;
        i32::try_from(year)
            .map_err(|_| SeasonError::OutOfRange(year))
            .and_then(Self::from_year)
    }

    #[must_use]
    pub const fn year(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        if self.0 > FIRST_SEASON {
            Self(self.0 - 1)
        } else {
            self
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 < LAST_SEASON {
            Self(self.0 + 1)
        } else {
            self
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
