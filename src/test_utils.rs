//! Shared constructors for unit tests.

use crate::{AvailabilityCalendar, CalendarDay, Constraints, DayRange, SelectionMode};

pub fn day(year: u16, month: u8, day: u8) -> CalendarDay {
    CalendarDay::new(year, month, day).expect("valid test day")
}

pub fn range(start: CalendarDay, end: CalendarDay) -> DayRange {
    DayRange::new(start, end).expect("valid test range")
}

/// An empty exception-mode calendar as of `today`
pub fn calendar(today: CalendarDay) -> AvailabilityCalendar {
    AvailabilityCalendar::new(Constraints::new(today, SelectionMode::Exception), [], false)
}
