//! The calendar selection reducer.
//!
//! Every interaction is a [`CalendarEvent`] fed through [`reduce`], which
//! returns a fresh [`CalendarState`] and an [`Effect`] telling the host
//! whether the selected day set changed. Invalid interactions never fail;
//! they are absorbed as no-ops or as the narrowed fallback described on
//! [`CalendarEvent::Activate`].
//!
//! ## Invariants
//!
//! - A committed range never contains a past day, a disabled day (unless
//!   disabled days are ignored), a day outside the exception window, or
//!   more days than the run cap allows.
//! - A range cannot leapfrog a disabled day: once a disabled day follows
//!   the anchor, nothing after it is reachable from that anchor.
//! - The displayed month is never before the month containing `today`.

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    AUTO_SELECT_YEARS, CalendarDay, Constraints, DayRange, SelectedDateSet, SelectionMode,
    SelectionState, YearMonth,
};

/// Month navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

/// A user or host interaction with the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    /// A day cell was clicked.
    ///
    /// The first click anchors a selection at the day. The second click
    /// commits the run between the anchor and the day when every day of it
    /// is valid; otherwise the selection narrows back to the anchor alone
    /// and stays anchored so the user can pick a shorter end.
    Activate(CalendarDay),
    /// The pointer is over a day; drives the preview while anchored
    Hover(CalendarDay),
    HoverClear,
    /// Clear the whole selection
    Reset,
    Navigate(Direction),
    /// The host's copy of the selected days changed
    SyncSeed(SelectedDateSet),
}

/// What the host has to do after a reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    None,
    /// The selected day set changed and listeners must be told
    SelectionChanged,
}

/// Per-cell flags for a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DayFlags {
    pub selected:       bool,
    pub past:           bool,
    pub disabled:       bool,
    pub range_start:    bool,
    pub range_end:      bool,
    pub in_range:       bool,
    pub preview:        bool,
    pub preview_end:    bool,
    pub beyond_max_run: bool,
}

impl DayFlags {
    /// Whether a click on this cell can change the selection
    pub const fn is_interactive(&self) -> bool {
        !self.past && !self.disabled
    }
}

/// Why an activation was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Past,
    Disabled,
    OutsideWindow,
}

/// Everything one calendar instance remembers between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    selection:   SelectionState,
    selected:    SelectedDateSet,
    preview:     Option<DayRange>,
    preview_end: Option<CalendarDay>,
    displayed:   YearMonth,
}

impl CalendarState {
    /// Builds the starting state of a calendar.
    ///
    /// In [`SelectionMode::Range`] with no seed days and `auto_select` set,
    /// every day of the coming year starting at `today` is selected, the
    /// default for a listing with no availability yet. Otherwise the seed
    /// is adopted as is.
    pub fn initialize(
        seed: impl IntoIterator<Item = CalendarDay>,
        auto_select: bool,
        constraints: &Constraints,
    ) -> Self {
        let seed: SelectedDateSet = seed.into_iter().collect();
        let selected = if constraints.mode == SelectionMode::Range && seed.is_empty() && auto_select {
            let selected = auto_selection(constraints.today);
            debug!(
                today = %constraints.today,
                days = selected.len(),
                "Auto-selected one year of availability"
            );
            selected
        } else {
            seed
        };

        Self {
            selection: selection_for(&selected),
            selected,
            preview: None,
            preview_end: None,
            displayed: constraints.today.year_month(),
        }
    }

    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub const fn selected(&self) -> &SelectedDateSet {
        &self.selected
    }

    /// The hover preview run, anchor included
    pub const fn preview(&self) -> Option<DayRange> {
        self.preview
    }

    pub const fn displayed_month(&self) -> YearMonth {
        self.displayed
    }

    pub fn is_selected(&self, day: &CalendarDay) -> bool {
        self.selected.contains(day)
    }

    pub fn is_past(&self, day: &CalendarDay, constraints: &Constraints) -> bool {
        constraints.is_past(day)
    }

    /// Disabled for display: listed as disabled, outside the exception
    /// window, or cut off from the current anchor by a disabled day.
    pub fn is_disabled(&self, day: &CalendarDay, constraints: &Constraints) -> bool {
        constraints.is_disabled_day(day)
            || constraints.is_outside_window(day)
            || self
                .selection
                .anchor()
                .is_some_and(|anchor| constraints.is_blocked_from(&anchor, day))
    }

    pub fn is_range_start(&self, day: &CalendarDay) -> bool {
        match self.selection {
            SelectionState::Anchored(start) | SelectionState::Committed(start, _) => start == *day,
            SelectionState::Empty => false,
        }
    }

    pub fn is_range_end(&self, day: &CalendarDay) -> bool {
        matches!(self.selection, SelectionState::Committed(_, end) if end == *day)
    }

    /// Strictly between the committed start and end
    pub fn is_in_range(&self, day: &CalendarDay) -> bool {
        self.selection
            .committed_range()
            .is_some_and(|range| range.strictly_contains(day))
    }

    pub fn is_in_preview_range(&self, day: &CalendarDay) -> bool {
        self.preview.is_some_and(|preview| preview.contains(day))
    }

    pub fn is_preview_end(&self, day: &CalendarDay) -> bool {
        self.preview_end == Some(*day)
    }

    pub fn is_beyond_max_run(&self, day: &CalendarDay, constraints: &Constraints) -> bool {
        self.selection
            .anchor()
            .is_some_and(|anchor| constraints.is_beyond_max_run(&anchor, day))
    }

    /// All render flags of one day cell
    pub fn cell(&self, day: &CalendarDay, constraints: &Constraints) -> DayFlags {
        DayFlags {
            selected:       self.is_selected(day),
            past:           self.is_past(day, constraints),
            disabled:       self.is_disabled(day, constraints),
            range_start:    self.is_range_start(day),
            range_end:      self.is_range_end(day),
            in_range:       self.is_in_range(day),
            preview:        self.is_in_preview_range(day),
            preview_end:    self.is_preview_end(day),
            beyond_max_run: self.is_beyond_max_run(day, constraints),
        }
    }

    fn cleared(&self) -> Self {
        Self {
            selection:   SelectionState::Empty,
            selected:    SelectedDateSet::new(),
            preview:     None,
            preview_end: None,
            displayed:   self.displayed,
        }
    }
}

/// Applies one event to `state`.
///
/// Pure: the same state, event and constraints always produce the same
/// result, and `state` itself is left untouched.
pub fn reduce(state: &CalendarState, event: CalendarEvent, constraints: &Constraints) -> (CalendarState, Effect) {
    match event {
        CalendarEvent::Activate(day) => activate(state, day, constraints),
        CalendarEvent::Hover(day) => (hover(state, day, constraints), Effect::None),
        CalendarEvent::HoverClear => (
            CalendarState {
                preview: None,
                preview_end: None,
                ..state.clone()
            },
            Effect::None,
        ),
        CalendarEvent::Reset => {
            debug!("Selection reset");
            (state.cleared(), Effect::SelectionChanged)
        },
        CalendarEvent::Navigate(direction) => (navigate(state, direction, constraints), Effect::None),
        CalendarEvent::SyncSeed(selected) => (sync_seed(state, selected), Effect::None),
    }
}

fn activate(state: &CalendarState, day: CalendarDay, constraints: &Constraints) -> (CalendarState, Effect) {
    if let Some(reason) = rejection(&day, constraints) {
        debug!(%day, ?reason, "Ignoring day activation");
        return (state.clone(), Effect::None);
    }

    let SelectionState::Anchored(start) = state.selection else {
        debug!(%day, "Anchored new selection");
        return (
            CalendarState {
                selection:   SelectionState::Anchored(day),
                selected:    SelectedDateSet::single(day),
                preview:     None,
                preview_end: None,
                displayed:   state.displayed,
            },
            Effect::SelectionChanged,
        );
    };

    let end = constraints.clamp_to_max_run(&start, day);
    let reachable = reachable_end(&start, end, constraints);
    if reachable.is_none() {
        debug!(%start, "Anchor is no longer selectable, clearing selection");
        return (state.cleared(), Effect::SelectionChanged);
    }
    if reachable != Some(end) {
        debug!(%start, %end, "Range crosses an unavailable day, keeping anchor only");
        return (
            CalendarState {
                selection: SelectionState::Anchored(start),
                selected: SelectedDateSet::single(start),
                ..state.clone()
            },
            Effect::SelectionChanged,
        );
    }

    let range = DayRange::spanning(start, end);
    let end_month = range.end().year_month();
    debug!(%range, days = range.len(), "Committed range");
    (
        CalendarState {
            selection:   SelectionState::Committed(range.start(), range.end()),
            selected:    SelectedDateSet::from_range(range),
            preview:     None,
            preview_end: None,
            displayed:   end_month,
        },
        Effect::SelectionChanged,
    )
}

fn rejection(day: &CalendarDay, constraints: &Constraints) -> Option<Rejection> {
    if constraints.is_past(day) {
        return Some(Rejection::Past);
    }
    if constraints.enforces_disabled() && constraints.is_disabled_day(day) {
        return Some(Rejection::Disabled);
    }
    constraints.is_outside_window(day).then_some(Rejection::OutsideWindow)
}

fn hover(state: &CalendarState, day: CalendarDay, constraints: &Constraints) -> CalendarState {
    let Some(anchor) = state.selection.anchor() else {
        return state.clone();
    };

    let toward = constraints.clamp_to_max_run(&anchor, day);
    let preview_end = reachable_end(&anchor, toward, constraints);
    let preview = preview_end.map(|end| DayRange::spanning(anchor, end));
    trace!(%anchor, %day, ?preview, "Hover preview");

    CalendarState {
        preview,
        preview_end,
        ..state.clone()
    }
}

fn navigate(state: &CalendarState, direction: Direction, constraints: &Constraints) -> CalendarState {
    let floor = constraints.today.year_month();
    let target = match direction {
        Direction::Next => state.displayed.next(),
        Direction::Previous => state.displayed.prev().filter(|month| *month >= floor),
    };

    match target {
        Some(displayed) => {
            debug!(month = %displayed, "Navigated calendar");
            CalendarState {
                displayed,
                ..state.clone()
            }
        },
        None => state.clone(),
    }
}

fn sync_seed(state: &CalendarState, selected: SelectedDateSet) -> CalendarState {
    if selected == state.selected {
        return state.clone();
    }
    debug!(days = selected.len(), "Resynchronized selection from host");
    CalendarState {
        selection: selection_for(&selected),
        selected,
        preview: None,
        preview_end: None,
        displayed: state.displayed,
    }
}

/// Walks from `anchor` one day at a time toward `toward` and returns the last
/// day reachable without touching an invalid one. `None` when the anchor
/// itself is no longer valid.
fn reachable_end(anchor: &CalendarDay, toward: CalendarDay, constraints: &Constraints) -> Option<CalendarDay> {
    let step = if toward >= *anchor { 1 } else { -1 };
    std::iter::successors(Some(*anchor), |day| {
        if *day == toward { None } else { day.add_days(step) }
    })
    .take_while(|day| constraints.is_selectable(day) && !constraints.is_blocked_from(anchor, day))
    .last()
}

/// Selection state matching a set of selected days adopted from outside
fn selection_for(selected: &SelectedDateSet) -> SelectionState {
    match (selected.first(), selected.last()) {
        (Some(start), Some(end)) if selected.is_contiguous() => SelectionState::Committed(start, end),
        _ => SelectionState::Empty,
    }
}

/// `today` and every following day up to, not including, the same date
/// `AUTO_SELECT_YEARS` later
fn auto_selection(today: CalendarDay) -> SelectedDateSet {
    let until = today.add_years(AUTO_SELECT_YEARS);
    std::iter::successors(Some(today), CalendarDay::succ)
        .take_while(|day| until.is_none_or(|until| *day < until))
        .collect()
}
