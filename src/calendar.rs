use std::fmt;

use crate::{
    CalendarDay, CalendarEvent, CalendarState, Constraints, DayFlags, DayRange, Direction, Effect,
    SelectedDateSet, SelectionState, WeekStart, YearMonth, month_grid, reduce,
};

/// Callback told about every change of the selected days
pub type SelectionListener = Box<dyn FnMut(&SelectedDateSet)>;

/// One calendar widget: its constraints, its current state and the listener
/// that persists selections.
///
/// Each operation runs one event through [`reduce`] and swaps in the state
/// it returns.
pub struct AvailabilityCalendar {
    constraints: Constraints,
    state:       CalendarState,
    listener:    Option<SelectionListener>,
}

impl fmt::Debug for AvailabilityCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityCalendar")
            .field("constraints", &self.constraints)
            .field("state", &self.state)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl AvailabilityCalendar {
    /// Creates a calendar seeded with `seed`; see [`CalendarState::initialize`]
    /// for when `auto_select` applies.
    pub fn new(constraints: Constraints, seed: impl IntoIterator<Item = CalendarDay>, auto_select: bool) -> Self {
        let state = CalendarState::initialize(seed, auto_select, &constraints);
        Self {
            constraints,
            state,
            listener: None,
        }
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl FnMut(&SelectedDateSet) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&SelectedDateSet) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Replaces the constraints for the next render cycle
    pub fn set_constraints(&mut self, constraints: Constraints) {
        self.constraints = constraints;
    }

    /// Runs `event` and notifies the listener when the selection changed.
    pub fn dispatch(&mut self, event: CalendarEvent) -> Effect {
        let (state, effect) = reduce(&self.state, event, &self.constraints);
        self.state = state;
        if let (Effect::SelectionChanged, Some(listener)) = (effect, self.listener.as_mut()) {
            listener(self.state.selected());
        }
        effect
    }

    pub fn on_day_activate(&mut self, day: CalendarDay) -> Effect {
        self.dispatch(CalendarEvent::Activate(day))
    }

    pub fn on_day_hover(&mut self, day: CalendarDay) {
        self.dispatch(CalendarEvent::Hover(day));
    }

    pub fn on_hover_clear(&mut self) {
        self.dispatch(CalendarEvent::HoverClear);
    }

    pub fn reset_selection(&mut self) {
        self.dispatch(CalendarEvent::Reset);
    }

    pub fn navigate_month(&mut self, direction: Direction) {
        self.dispatch(CalendarEvent::Navigate(direction));
    }

    /// Adopts the host's current list of selected days, without auto-selecting
    pub fn sync_seed(&mut self, dates: impl IntoIterator<Item = CalendarDay>) {
        self.dispatch(CalendarEvent::SyncSeed(dates.into_iter().collect()));
    }

    pub const fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub const fn state(&self) -> &CalendarState {
        &self.state
    }

    pub const fn selection(&self) -> &SelectionState {
        self.state.selection()
    }

    pub const fn selected_dates(&self) -> &SelectedDateSet {
        self.state.selected()
    }

    pub const fn displayed_month(&self) -> YearMonth {
        self.state.displayed_month()
    }

    pub const fn preview(&self) -> Option<DayRange> {
        self.state.preview()
    }

    pub fn is_selected(&self, day: &CalendarDay) -> bool {
        self.state.is_selected(day)
    }

    pub fn is_past(&self, day: &CalendarDay) -> bool {
        self.state.is_past(day, &self.constraints)
    }

    pub fn is_disabled(&self, day: &CalendarDay) -> bool {
        self.state.is_disabled(day, &self.constraints)
    }

    pub fn is_range_start(&self, day: &CalendarDay) -> bool {
        self.state.is_range_start(day)
    }

    pub fn is_range_end(&self, day: &CalendarDay) -> bool {
        self.state.is_range_end(day)
    }

    pub fn is_in_range(&self, day: &CalendarDay) -> bool {
        self.state.is_in_range(day)
    }

    pub fn is_in_preview_range(&self, day: &CalendarDay) -> bool {
        self.state.is_in_preview_range(day)
    }

    pub fn is_preview_end(&self, day: &CalendarDay) -> bool {
        self.state.is_preview_end(day)
    }

    pub fn is_beyond_max_run(&self, day: &CalendarDay) -> bool {
        self.state.is_beyond_max_run(day, &self.constraints)
    }

    pub fn cell(&self, day: &CalendarDay) -> DayFlags {
        self.state.cell(day, &self.constraints)
    }

    /// The displayed month as week rows of flagged cells
    pub fn displayed_cells(&self, week_start: WeekStart) -> Vec<[Option<(CalendarDay, DayFlags)>; 7]> {
        month_grid(self.displayed_month(), week_start)
            .weeks
            .into_iter()
            .map(|week| week.map(|slot| slot.map(|day| (day, self.cell(&day)))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::SelectionMode;
    use crate::test_utils::{calendar, day};

    type Log = Rc<RefCell<Vec<Vec<CalendarDay>>>>;

    fn recording(constraints: Constraints) -> (AvailabilityCalendar, Log) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let calendar = AvailabilityCalendar::new(constraints, [], false)
            .with_listener(move |selected| sink.borrow_mut().push(selected.to_vec()));
        (calendar, log)
    }

    #[test]
    fn test_listener_sees_provisional_and_committed_sets() {
        let (mut cal, log) = recording(Constraints::new(day(2024, 3, 1), SelectionMode::Exception));

        cal.on_day_activate(day(2024, 3, 10));
        cal.on_day_hover(day(2024, 3, 11));
        cal.on_day_activate(day(2024, 3, 12));

        assert_eq!(
            *log.borrow(),
            vec![
                vec![day(2024, 3, 10)],
                vec![day(2024, 3, 10), day(2024, 3, 11), day(2024, 3, 12)],
            ]
        );
    }

    #[test]
    fn test_listener_not_called_for_rejected_activation() {
        let (mut cal, log) = recording(Constraints::new(day(2024, 3, 1), SelectionMode::Exception));

        assert_eq!(cal.on_day_activate(day(2024, 2, 1)), Effect::None);
        cal.navigate_month(Direction::Next);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_listener_called_with_empty_set_on_reset() {
        let (mut cal, log) = recording(Constraints::new(day(2024, 3, 1), SelectionMode::Exception));

        cal.on_day_activate(day(2024, 3, 10));
        cal.reset_selection();
        cal.reset_selection();

        assert_eq!(log.borrow().len(), 3);
        assert!(log.borrow()[1].is_empty());
        assert!(log.borrow()[2].is_empty());
        assert_eq!(*cal.selection(), SelectionState::Empty);
    }

    #[test]
    fn test_narrowed_fallback_notifies_anchor_only() {
        let constraints =
            Constraints::new(day(2024, 3, 1), SelectionMode::Exception).with_disabled_days([day(2024, 3, 12)]);
        let (mut cal, log) = recording(constraints);

        cal.on_day_activate(day(2024, 3, 10));
        cal.on_day_activate(day(2024, 3, 15));

        assert_eq!(log.borrow().last(), Some(&vec![day(2024, 3, 10)]));
        assert_eq!(*cal.selection(), SelectionState::Anchored(day(2024, 3, 10)));
    }

    #[test]
    fn test_sync_seed_echo_does_not_break_two_clicks() {
        let (mut cal, _log) = recording(Constraints::new(day(2024, 3, 1), SelectionMode::Exception));

        cal.on_day_activate(day(2024, 3, 10));
        let echo = cal.selected_dates().to_vec();
        cal.sync_seed(echo);
        cal.on_day_activate(day(2024, 3, 11));

        assert_eq!(
            *cal.selection(),
            SelectionState::Committed(day(2024, 3, 10), day(2024, 3, 11))
        );
    }

    #[test]
    fn test_predicates_forward_constraints() {
        let mut cal = calendar(day(2024, 3, 1));
        cal.set_constraints(cal.constraints().clone().with_disabled_days([day(2024, 3, 5)]));

        assert!(cal.is_past(&day(2024, 2, 29)));
        assert!(cal.is_disabled(&day(2024, 3, 5)));

        cal.on_day_activate(day(2024, 3, 10));
        cal.on_day_hover(day(2024, 3, 12));
        assert!(cal.is_range_start(&day(2024, 3, 10)));
        assert!(cal.is_in_preview_range(&day(2024, 3, 11)));
        assert!(cal.is_preview_end(&day(2024, 3, 12)));
        cal.on_hover_clear();
        assert_eq!(cal.preview(), None);

        cal.on_day_activate(day(2024, 3, 12));
        assert!(cal.is_in_range(&day(2024, 3, 11)));
        assert!(cal.is_range_end(&day(2024, 3, 12)));
        assert!(cal.is_selected(&day(2024, 3, 12)));
        assert!(!cal.is_beyond_max_run(&day(2024, 5, 1)));
    }

    #[test]
    fn test_displayed_cells_cover_month() {
        let mut cal = calendar(day(2024, 3, 1));
        cal.on_day_activate(day(2024, 3, 2));

        let cells = cal.displayed_cells(WeekStart::Sunday);
        let flagged: Vec<_> = cells.iter().flatten().flatten().collect();
        assert_eq!(flagged.len(), 31);

        let (first, flags) = flagged[0];
        assert_eq!(*first, day(2024, 3, 1));
        assert!(!flags.selected);
        let (second, flags) = flagged[1];
        assert_eq!(*second, day(2024, 3, 2));
        assert!(flags.selected && flags.range_start);
    }

    #[test]
    fn test_navigation_and_month_follow() {
        let mut cal = calendar(day(2024, 3, 1));
        cal.navigate_month(Direction::Previous);
        assert_eq!(cal.displayed_month(), YearMonth::new(2024, 3).unwrap());

        cal.on_day_activate(day(2024, 3, 30));
        cal.on_day_activate(day(2024, 5, 2));
        assert_eq!(cal.displayed_month(), YearMonth::new(2024, 5).unwrap());
        assert_eq!(cal.selected_dates().len(), 34);
    }
}
