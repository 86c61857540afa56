use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{CalendarDay, DayRange, prelude::*};

/// Where the two-click range selection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionState {
    /// Nothing picked
    #[default]
    Empty,
    /// A start day is picked and the user is choosing the end
    Anchored(CalendarDay),
    /// A closed, inclusive range; `start == end` for a single day
    Committed(CalendarDay, CalendarDay),
}

impl SelectionState {
    pub const fn anchor(&self) -> Option<CalendarDay> {
        match self {
            Self::Anchored(start) => Some(*start),
            Self::Empty | Self::Committed(..) => None,
        }
    }

    pub fn committed_range(&self) -> Option<DayRange> {
        match self {
            Self::Committed(start, end) => Some(DayRange::spanning(*start, *end)),
            Self::Empty | Self::Anchored(_) => None,
        }
    }

    pub const fn is_anchored(&self) -> bool {
        matches!(self, Self::Anchored(_))
    }
}

/// The ordered, de-duplicated days a calendar reports as selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedDateSet(BTreeSet<CalendarDay>);

impl SelectedDateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(day: CalendarDay) -> Self {
        Self(BTreeSet::from([day]))
    }

    /// Every day of `range`, in order
    pub fn from_range(range: DayRange) -> Self {
        range.iter().collect()
    }

    pub fn first(&self) -> Option<CalendarDay> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<CalendarDay> {
        self.0.last().copied()
    }

    /// The days as an ordered vector
    pub fn to_vec(&self) -> Vec<CalendarDay> {
        self.0.iter().copied().collect()
    }

    /// Whether the days form one unbroken run
    pub fn is_contiguous(&self) -> bool {
        self.runs().len() <= 1
    }

    /// Splits the set into maximal runs of consecutive days.
    pub fn runs(&self) -> Vec<DayRange> {
        let mut runs = Vec::new();
        let mut days = self.0.iter().copied();
        let Some(mut start) = days.next() else {
            return runs;
        };
        let mut prev = start;
        for day in days {
            if prev.succ() != Some(day) {
                runs.push(DayRange::spanning(start, prev));
                start = day;
            }
            prev = day;
        }
        runs.push(DayRange::spanning(start, prev));
        runs
    }
}

impl FromIterator<CalendarDay> for SelectedDateSet {
    fn from_iter<I: IntoIterator<Item = CalendarDay>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SelectedDateSet {
    type Item = &'a CalendarDay;
    type IntoIter = std::collections::btree_set::Iter<'a, CalendarDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<SelectedDateSet> for Vec<CalendarDay> {
    fn from(set: SelectedDateSet) -> Self {
        set.0.into_iter().collect()
    }
}
