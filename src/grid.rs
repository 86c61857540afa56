use serde::{Deserialize, Serialize};

use crate::{CalendarDay, DAYS_IN_WEEK, Weekday, YearMonth};

/// One calendar row; `None` pads the cells outside the month
pub type Week = [Option<CalendarDay>; DAYS_IN_WEEK as usize];

/// First column of each rendered week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column of `weekday` in a week laid out from this start
    pub const fn column(self, weekday: Weekday) -> usize {
        let from_monday = weekday.days_from_monday() as usize;
        match self {
            Self::Monday => from_monday,
            Self::Sunday => (from_monday + 1) % DAYS_IN_WEEK as usize,
        }
    }
}

/// A month laid out as whole weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    /// Days of the month in order, padding skipped
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }
}

/// Lays `month` out in rows of seven, starting each row on `week_start`.
pub fn month_grid(month: YearMonth, week_start: WeekStart) -> MonthGrid {
    let mut weeks = Vec::new();
    let mut week: Week = [None; DAYS_IN_WEEK as usize];

    let days = month.first_day().into_iter().flat_map(|first| {
        std::iter::successors(Some(first), CalendarDay::succ).take_while(move |day| month.contains(day))
    });

    for day in days {
        let column = week_start.column(day.weekday());
        week[column] = Some(day);
        if column == DAYS_IN_WEEK as usize - 1 {
            weeks.push(week);
            week = [None; DAYS_IN_WEEK as usize];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }

    MonthGrid { month, weeks }
}
