use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDay, ParseError, RANGE_SEPARATOR, prelude::*};

/// An inclusive run of calendar days.
/// The start day must be less than or equal to the end day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DayRange {
    start: CalendarDay,
    end:   CalendarDay,
}

/// Error type for day range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start day is after end day.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: CalendarDay, end: CalendarDay },

    /// Error parsing one of the endpoints.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DayRange {
    /// Creates a new range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: CalendarDay, end: CalendarDay) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds the range spanning two days given in either order
    pub fn spanning(a: CalendarDay, b: CalendarDay) -> Self {
        Self {
            start: a.min(b),
            end:   a.max(b),
        }
    }

    /// A range covering exactly one day
    pub const fn single(day: CalendarDay) -> Self {
        Self { start: day, end: day }
    }

    pub const fn start(&self) -> CalendarDay {
        self.start
    }

    pub const fn end(&self) -> CalendarDay {
        self.end
    }

    /// Run length: number of days, counting both endpoints
    pub fn len(&self) -> u32 {
        u32::try_from(self.start.days_until(&self.end) + 1).unwrap_or(u32::MAX)
    }

    /// Always false; a range holds at least one day
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, day: &CalendarDay) -> bool {
        self.start <= *day && *day <= self.end
    }

    /// Whether `day` lies strictly between the endpoints
    pub fn strictly_contains(&self, day: &CalendarDay) -> bool {
        self.start < *day && *day < self.end
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterates every day of the range in order
    pub fn iter(&self) -> impl Iterator<Item = CalendarDay> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |day| day.succ().filter(|next| *next <= end))
    }
}

impl IntoIterator for DayRange {
    type Item = CalendarDay;
    type IntoIter = Box<dyn Iterator<Item = CalendarDay>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl FromStr for DayRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start, end) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found despite count == 1"))
                })?;
                Self::new(start.trim().parse()?, end.trim().parse()?)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DayRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
