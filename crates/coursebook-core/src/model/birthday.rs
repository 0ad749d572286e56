use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fields::FieldError;

pub const BIRTHDAY_CONSTRAINTS: &str =
    "Birthdays should be a valid calendar date in the format dd-mm-yyyy";

const DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// A calendar date of birth, written `dd-mm-yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parse a strict `dd-mm-yyyy` date.
    ///
    /// Both day and month must be two digits and the year four; the date must
    /// exist (`31-04-2024` and `29-02-2023` are rejected).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the text is malformed or not a real date.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let invalid = || FieldError {
            field: "birthday",
            constraint: BIRTHDAY_CONSTRAINTS,
        };
        let text = raw.trim();
        let bytes = text.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[2] == b'-'
            && bytes[5] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
        if !shape_ok {
            return Err(invalid());
        }
        let day: u32 = text[0..2].parse().map_err(|_| invalid())?;
        let month: u32 = text[3..5].parse().map_err(|_| invalid())?;
        let year: i32 = text[6..10].parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Whole days from `reference` until the next occurrence of this birthday.
    ///
    /// Returns 0 when the birthday falls on `reference`. A 29 February
    /// birthday is observed on 28 February in non-leap years.
    #[must_use]
    pub fn days_until_next(self, reference: NaiveDate) -> i64 {
        let this_year = occurrence_in(self.0, reference.year());
        let next = if this_year < reference {
            occurrence_in(self.0, reference.year() + 1)
        } else {
            this_year
        };
        (next - reference).num_days()
    }
}

fn occurrence_in(birthday: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day() - 1))
        .unwrap_or(birthday)
}

impl FromStr for Birthday {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Birthday {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}
