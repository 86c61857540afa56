//! Calendar days and months.
//!
//! A [`CalendarDay`] is a plain Gregorian date with no time-of-day component.
//! Day arithmetic goes through a day ordinal (days since 1970-01-01) so that
//! stepping, distances and weekday lookups are exact across month and year
//! boundaries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CIVIL_EPOCH_SHIFT, DATE_SEPARATOR, DAYS_IN_WEEK, DAYS_PER_GREGORIAN_CYCLE, DECEMBER, FEBRUARY,
    FEBRUARY_DAYS_LEAP, JANUARY, MIN_DAY,
};
use crate::types::{Day, Month, Year, days_in_month};
use crate::{ParseError, prelude::*};

/// A date normalized to midnight, compared by (year, month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year}-{month}-{day}")]
pub struct CalendarDay {
    year:  Year,
    month: Month,
    day:   Day,
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Zero-based position counting from Monday
    pub const fn days_from_monday(self) -> u8 {
        self as u8
    }

    fn from_days_from_monday(index: i64) -> Self {
        // rem_euclid keeps the index in 0..7 for any input
        Self::ALL[usize::try_from(index.rem_euclid(i64::from(DAYS_IN_WEEK))).unwrap_or_default()]
    }
}

impl CalendarDay {
    /// Creates a day from raw components, validating each of them.
    ///
    /// # Errors
    /// Returns a `ParseError` if the year, month or day is out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Creates a day from already validated parts
    pub const fn from_parts(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// The month this day falls in
    pub const fn year_month(&self) -> YearMonth {
        YearMonth {
            year:  self.year,
            month: self.month,
        }
    }

    /// Days since 1970-01-01 (negative before it).
    pub fn ordinal(&self) -> i64 {
        let month = i64::from(self.month());
        let year = i64::from(self.year()) - i64::from(month <= i64::from(FEBRUARY));
        let era = year.div_euclid(400);
        let year_of_era = year - era * 400;
        let month_from_march = (month + 9) % 12;
        let day_of_year = (153 * month_from_march + 2) / 5 + i64::from(self.day()) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * DAYS_PER_GREGORIAN_CYCLE + day_of_era - CIVIL_EPOCH_SHIFT
    }

    /// Inverse of [`CalendarDay::ordinal`]. Returns `None` outside the supported year range.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        let shifted = ordinal + CIVIL_EPOCH_SHIFT;
        let era = shifted.div_euclid(DAYS_PER_GREGORIAN_CYCLE);
        let day_of_era = shifted - era * DAYS_PER_GREGORIAN_CYCLE;
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let month_from_march = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
        let month = if month_from_march < 10 {
            month_from_march + 3
        } else {
            month_from_march - 9
        };
        let year = year_of_era + era * 400 + i64::from(month <= i64::from(FEBRUARY));

        Self::new(
            u16::try_from(year).ok()?,
            u8::try_from(month).ok()?,
            u8::try_from(day).ok()?,
        )
        .ok()
    }

    /// The day `days` after this one (before it when negative)
    pub fn add_days(&self, days: i64) -> Option<Self> {
        Self::from_ordinal(self.ordinal().checked_add(days)?)
    }

    /// The following day
    pub fn succ(&self) -> Option<Self> {
        self.add_days(1)
    }

    /// The preceding day
    pub fn pred(&self) -> Option<Self> {
        self.add_days(-1)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Self) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// Same month and day `years` later; February 29 lands on February 28
    /// when the target year is not a leap year.
    pub fn add_years(&self, years: u16) -> Option<Self> {
        let year = Year::new(self.year().checked_add(years)?).ok()?;
        let day = if self.month() == FEBRUARY && self.day() == FEBRUARY_DAYS_LEAP && !year.is_leap() {
            FEBRUARY_DAYS_LEAP - 1
        } else {
            self.day()
        };
        Some(Self {
            year,
            month: self.month,
            day: Day::new(day, year, self.month).ok()?,
        })
    }

    pub fn weekday(&self) -> Weekday {
        // 1970-01-01 was a Thursday
        Weekday::from_days_from_monday(self.ordinal() + i64::from(Weekday::Thursday.days_from_monday()))
    }
}

impl FromStr for CalendarDay {
    type Err = ParseError;

    /// Parses ISO `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} {DATE_SEPARATOR} separators",
                parts.len() - 1
            )));
        };

        let year = year
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat((*year).to_owned()))?;
        let month = month
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat((*month).to_owned()))?;
        let day = day
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat((*day).to_owned()))?;

        Self::new(year, month, day)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A displayed calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{year}-{month}")]
pub struct YearMonth {
    year:  Year,
    month: Month,
}

impl YearMonth {
    /// # Errors
    /// Returns a `ParseError` if the year or month is out of range.
    pub fn new(year: u16, month: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year:  Year::new(year)?,
            month: Month::new(month)?,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Number of days in this month
    pub const fn len_days(&self) -> u8 {
        days_in_month(self.year(), self.month())
    }

    pub fn first_day(&self) -> Option<CalendarDay> {
        CalendarDay::new(self.year(), self.month(), MIN_DAY).ok()
    }

    pub fn last_day(&self) -> Option<CalendarDay> {
        CalendarDay::new(self.year(), self.month(), self.len_days()).ok()
    }

    pub fn contains(&self, day: &CalendarDay) -> bool {
        day.year_month() == *self
    }

    /// The month after this one, `None` past the last supported year
    pub fn next(&self) -> Option<Self> {
        if self.month() == DECEMBER {
            Self::new(self.year().checked_add(1)?, JANUARY).ok()
        } else {
            Self::new(self.year(), self.month() + 1).ok()
        }
    }

    /// The month before this one, `None` before the first supported year
    pub fn prev(&self) -> Option<Self> {
        if self.month() == JANUARY {
            Self::new(self.year().checked_sub(1)?, DECEMBER).ok()
        } else {
            Self::new(self.year(), self.month() - 1).ok()
        }
    }
}
