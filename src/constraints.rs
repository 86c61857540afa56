use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::{CalendarDay, prelude::*};

/// Which availability concept a calendar instance edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// The main availability window; may extend past any existing window
    #[default]
    #[display(fmt = "range")]
    Range,
    /// Blockout days inside the availability window
    #[display(fmt = "exception")]
    Exception,
}

/// Caller-supplied limits on what may be selected.
///
/// Constraints are fixed for one render cycle; the host swaps in a new value
/// when the external data (disabled days, bounds) changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    /// Days strictly before this are never selectable
    pub today:           CalendarDay,
    pub mode:            SelectionMode,
    pub disabled_days:   BTreeSet<CalendarDay>,
    /// Inclusive window start; only applied in [`SelectionMode::Exception`]
    pub lower_bound:     Option<CalendarDay>,
    /// Inclusive window end; only applied in [`SelectionMode::Exception`]
    pub upper_bound:     Option<CalendarDay>,
    /// Longest committed run, counting the anchor day
    pub max_run_length:  Option<NonZeroU32>,
    /// Treat disabled days as informational only
    pub ignore_disabled: bool,
}

impl Constraints {
    pub const fn new(today: CalendarDay, mode: SelectionMode) -> Self {
        Self {
            today,
            mode,
            disabled_days: BTreeSet::new(),
            lower_bound: None,
            upper_bound: None,
            max_run_length: None,
            ignore_disabled: false,
        }
    }

    #[must_use]
    pub fn with_disabled_days(mut self, days: impl IntoIterator<Item = CalendarDay>) -> Self {
        self.disabled_days = days.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, lower: Option<CalendarDay>, upper: Option<CalendarDay>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Caps committed runs at `days`; zero removes the cap.
    #[must_use]
    pub fn with_max_run_length(mut self, days: u32) -> Self {
        self.max_run_length = NonZeroU32::new(days);
        self
    }

    #[must_use]
    pub fn with_ignore_disabled(mut self, ignore: bool) -> Self {
        self.ignore_disabled = ignore;
        self
    }

    pub fn is_past(&self, day: &CalendarDay) -> bool {
        *day < self.today
    }

    /// Whether `day` is listed as disabled, regardless of the bypass flag
    pub fn is_disabled_day(&self, day: &CalendarDay) -> bool {
        self.disabled_days.contains(day)
    }

    /// Whether disabled days stop a selection
    pub const fn enforces_disabled(&self) -> bool {
        !self.ignore_disabled
    }

    /// Whether `day` falls outside the exception window
    pub fn is_outside_window(&self, day: &CalendarDay) -> bool {
        self.mode == SelectionMode::Exception
            && (self.lower_bound.is_some_and(|lower| *day < lower)
                || self.upper_bound.is_some_and(|upper| *day > upper))
    }

    /// Whether `day` may be part of a selection on its own merits
    pub fn is_selectable(&self, day: &CalendarDay) -> bool {
        !self.is_past(day)
            && (self.ignore_disabled || !self.is_disabled_day(day))
            && !self.is_outside_window(day)
    }

    /// First disabled day strictly after `anchor`; nothing past it is reachable
    /// from `anchor` without crossing it.
    pub fn first_disabled_after(&self, anchor: &CalendarDay) -> Option<CalendarDay> {
        self.disabled_days
            .range((Bound::Excluded(*anchor), Bound::Unbounded))
            .next()
            .copied()
    }

    /// Whether `day` is cut off from `anchor` by a disabled day in between
    pub fn is_blocked_from(&self, anchor: &CalendarDay, day: &CalendarDay) -> bool {
        self.enforces_disabled() && self.first_disabled_after(anchor).is_some_and(|blocker| *day > blocker)
    }

    /// Whether a run from `anchor` to `day` would be longer than the cap
    pub fn is_beyond_max_run(&self, anchor: &CalendarDay, day: &CalendarDay) -> bool {
        self.max_run_length
            .is_some_and(|max| anchor.days_until(day).unsigned_abs() >= u64::from(max.get()))
    }

    /// Furthest day a run starting at `anchor` may reach in the direction of `toward`.
    pub fn clamp_to_max_run(&self, anchor: &CalendarDay, toward: CalendarDay) -> CalendarDay {
        let Some(max) = self.max_run_length else {
            return toward;
        };
        let reach = i64::from(max.get()) - 1;
        let clamped = match toward.cmp(anchor) {
            Ordering::Equal => return toward,
            Ordering::Greater => anchor.add_days(reach).map(|limit| toward.min(limit)),
            Ordering::Less => anchor.add_days(-reach).map(|limit| toward.max(limit)),
        };
        clamped.unwrap_or(toward)
    }
}
