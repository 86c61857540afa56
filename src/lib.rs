//! Date-range selection and validation for listing availability calendars.
//!
//! The crate turns a stream of day clicks and hovers into a validated,
//! ordered set of selected days. [`reduce`] is the pure state transition;
//! [`AvailabilityCalendar`] owns one calendar's state, its [`Constraints`]
//! and a change listener, and answers the per-day [`DayFlags`] a renderer
//! paints from.
//!
//! ```
//! use availability_calendar::{AvailabilityCalendar, CalendarDay, Constraints, SelectionMode};
//!
//! let today: CalendarDay = "2024-03-01".parse()?;
//! let constraints = Constraints::new(today, SelectionMode::Exception);
//! let mut calendar = AvailabilityCalendar::new(constraints, Vec::new(), false);
//!
//! calendar.on_day_activate("2024-03-10".parse()?);
//! calendar.on_day_activate("2024-03-15".parse()?);
//! assert_eq!(calendar.selected_dates().len(), 6);
//! # Ok::<(), availability_calendar::ParseError>(())
//! ```

mod calendar;
mod config;
mod consts;
mod constraints;
mod day;
mod engine;
mod grid;
mod prelude;
mod range;
mod selection;
#[cfg(test)]
mod test_utils;
mod types;

pub use calendar::{AvailabilityCalendar, SelectionListener};
pub use config::{CalendarConfig, ConfigError};
pub use consts::*;
pub use constraints::{Constraints, SelectionMode};
pub use day::{CalendarDay, Weekday, YearMonth};
pub use engine::{CalendarEvent, CalendarState, DayFlags, Direction, Effect, reduce};
pub use grid::{MonthGrid, Week, WeekStart, month_grid};
pub use range::{DayRange, RangeError};
pub use selection::{SelectedDateSet, SelectionState};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;

/// Error produced when building calendar values from raw components or text.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}
