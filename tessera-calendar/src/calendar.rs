//! The calendar engine.
//!
//! [`Calendar`] owns the configuration, the live cells and the selection, and
//! runs one reconcile pipeline after every mutation:
//!
//! 1. apply visibility changes posted from other threads,
//! 2. lay the displayed month out,
//! 3. synchronize the live cells with the layout,
//! 4. reapply the selected dates to the live cells,
//! 5. notify listeners about visible cells that changed.
//!
//! Listeners cannot borrow the calendar while it is notifying them. They
//! queue configuration changes on a [`CalendarCommands`] sink instead; the
//! calendar applies those through its regular setters once delivery of the
//! current event finishes, so a change requested from inside a notification
//! ends in the same state as the same change made from outside.
use std::{
    collections::{BTreeSet, VecDeque},
    sync::Arc,
};

use chrono::{NaiveDate, Weekday};
use tracing::{debug, trace, warn};

use crate::{
    config::{CalendarConfig, SelectableDates, is_date_selectable, normalize_first_day_of_week},
    date::YearMonth,
    dispatch::{VisibilityChange, VisibilityDispatcher, VisibilityPoster},
    error::CalendarError,
    grid::{CellRecord, GridSynchronizer},
    header::{HeaderSequence, header_sequence},
    host::{CalendarEvent, CalendarHost},
    layout::{CellPosition, compute_placements},
    selection::{SelectionController, SelectionMode},
};

/// A configuration change queued from inside an event listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigChange {
    /// See [`Calendar::set_displayed_month`].
    DisplayedMonth(YearMonth),
    /// See [`Calendar::set_first_day_of_week`].
    FirstDayOfWeek(Weekday),
    /// See [`Calendar::set_show_weekends`].
    ShowWeekends(bool),
    /// See [`Calendar::set_show_days_from_other_months`].
    ShowDaysFromOtherMonths(bool),
    /// See [`Calendar::set_selection_mode`].
    SelectionMode(SelectionMode),
    /// See [`Calendar::set_selected_dates`].
    SelectedDates(BTreeSet<NaiveDate>),
}

/// Sink handed to event listeners for queueing configuration changes.
#[derive(Debug, Default)]
pub struct CalendarCommands {
    changes: Vec<ConfigChange>,
}

impl CalendarCommands {
    /// Queues a change. Changes are applied in queueing order.
    pub fn push(&mut self, change: ConfigChange) {
        self.changes.push(change);
    }
}

type Listener = Box<dyn FnMut(&CalendarEvent, &mut CalendarCommands)>;

enum PendingEvent {
    Tapped(CellRecord),
    Updated(CellPosition),
}

/// A month view: layout, live cells and selection driven through a
/// [`CalendarHost`].
pub struct Calendar<H: CalendarHost> {
    config: CalendarConfig,
    selectable_dates: Arc<dyn SelectableDates>,
    cell_template: Option<H::Template>,
    header_template: Option<H::Template>,
    grid: GridSynchronizer<H::CellHandle>,
    selection: SelectionController,
    headers: HeaderSequence,
    host: H,
    dispatcher: VisibilityDispatcher,
    listeners: Vec<Listener>,
    pending_events: VecDeque<PendingEvent>,
    dispatching: bool,
}

impl<H: CalendarHost> Calendar<H> {
    /// Creates a calendar and materializes its first grid through `host`.
    pub fn new(config: CalendarConfig, host: H) -> Self {
        let config = config.normalized();
        let mut calendar = Self {
            config,
            selectable_dates: crate::config::CalendarDefaults::all_dates(),
            cell_template: None,
            header_template: None,
            grid: GridSynchronizer::new(),
            selection: SelectionController::new(config.selection_mode),
            headers: HeaderSequence::new(),
            host,
            dispatcher: VisibilityDispatcher::default(),
            listeners: Vec::new(),
            pending_events: VecDeque::new(),
            dispatching: false,
        };
        calendar.refresh_headers();
        calendar.reconcile();
        calendar
    }

    /// Current configuration.
    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Visible cells in row-major order.
    pub fn days(&self) -> impl Iterator<Item = &CellRecord> {
        self.grid.records().filter(|record| record.is_visible())
    }

    /// Every live cell, including hidden filler, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &CellRecord> {
        self.grid.records()
    }

    /// Live cell at `position`.
    pub fn cell(&self, position: CellPosition) -> Option<&CellRecord> {
        self.grid.get(position)
    }

    /// Weekday of each header column.
    pub fn headers(&self) -> &[Weekday] {
        &self.headers
    }

    /// Number of week rows in the grid.
    pub fn weeks_in_month(&self) -> usize {
        self.grid.row_count()
    }

    /// Selected dates, including ones without a live cell.
    pub fn selected_dates(&self) -> &BTreeSet<NaiveDate> {
        self.selection.selected_dates()
    }

    /// The view-layer collaborator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the view-layer collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handle for posting visibility changes from other threads.
    pub fn visibility_poster(&self) -> VisibilityPoster {
        self.dispatcher.poster()
    }

    /// Registers a listener for [`CalendarEvent`]s.
    pub fn on_event(
        &mut self,
        listener: impl FnMut(&CalendarEvent, &mut CalendarCommands) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    /// Shows `month`.
    pub fn set_displayed_month(&mut self, month: YearMonth) {
        self.config.displayed_month = month;
        self.reconcile();
    }

    /// Shows the month after the current one.
    pub fn next_month(&mut self) {
        self.set_displayed_month(self.config.displayed_month.add_months(1));
    }

    /// Shows the month before the current one.
    pub fn previous_month(&mut self) {
        self.set_displayed_month(self.config.displayed_month.add_months(-1));
    }

    /// Sets the weekday of the first column.
    ///
    /// Saturday and Sunday become Monday while weekends are hidden.
    pub fn set_first_day_of_week(&mut self, first_day_of_week: Weekday) {
        self.config.first_day_of_week =
            normalize_first_day_of_week(first_day_of_week, self.config.show_weekends);
        if self.config.first_day_of_week != first_day_of_week {
            debug!(
                "First day of week {first_day_of_week:?} coerced to {:?} while weekends are hidden",
                self.config.first_day_of_week
            );
        }
        self.refresh_headers();
        self.reconcile();
    }

    /// Shows or hides the Saturday and Sunday columns.
    pub fn set_show_weekends(&mut self, show_weekends: bool) {
        self.config.show_weekends = show_weekends;
        let first_day_of_week =
            normalize_first_day_of_week(self.config.first_day_of_week, show_weekends);
        if first_day_of_week != self.config.first_day_of_week {
            debug!(
                "First day of week {:?} coerced to {first_day_of_week:?} after hiding weekends",
                self.config.first_day_of_week
            );
            self.config.first_day_of_week = first_day_of_week;
        }
        self.refresh_headers();
        self.reconcile();
    }

    /// Shows or hides filler days from the neighbouring months.
    pub fn set_show_days_from_other_months(&mut self, show: bool) {
        self.config.show_days_from_other_months = show;
        self.reconcile();
    }

    /// Switches the selection mode and clears the selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        self.selection.set_mode(mode);
        self.reconcile();
    }

    /// Replaces the selected dates.
    ///
    /// Dates without a live cell are kept and show up once a matching cell
    /// is live again.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidConfiguration`] when more than one date
    /// is passed in [`SelectionMode::SingleSelect`]. Nothing changes in that
    /// case.
    pub fn set_selected_dates(
        &mut self,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<(), CalendarError> {
        let dates = dates.into_iter().collect();
        self.selection.set_selected_dates(dates)?;
        self.reconcile();
        Ok(())
    }

    /// Replaces the policy deciding which cells are selectable.
    pub fn set_selectable_dates(&mut self, selectable_dates: Arc<dyn SelectableDates>) {
        self.selectable_dates = selectable_dates;
        self.reconcile();
    }

    /// Sets the template handed to the host for cells created from now on.
    pub fn set_cell_template(&mut self, template: Option<H::Template>) {
        self.cell_template = template;
        self.reconcile();
    }

    /// Sets the header template and re-creates every header widget with it.
    pub fn set_header_template(&mut self, template: Option<H::Template>) {
        self.header_template = template;
        self.headers.clear();
        self.refresh_headers();
        self.reconcile();
    }

    /// Handles a tap on the cell at `position`.
    ///
    /// Taps on unknown positions and non-selectable cells are ignored.
    ///
    /// # Errors
    ///
    /// Propagates [`CalendarError`] from the selection update.
    pub fn tap(&mut self, position: CellPosition) -> Result<(), CalendarError> {
        let Some(record) = self.grid.get(position).cloned() else {
            debug!("Ignoring tap on empty position {position:?}");
            return Ok(());
        };
        if !self.selection.on_tap(&record)? {
            debug!("Ignoring tap on non-selectable cell {position:?}");
            return Ok(());
        }
        self.reconcile();
        let record = self.grid.get(position).cloned().unwrap_or(record);
        self.pending_events.push_back(PendingEvent::Tapped(record));
        self.deliver_events();
        Ok(())
    }

    /// Applies visibility changes posted through a [`VisibilityPoster`].
    ///
    /// Returns how many changes were drained. Changes for positions without
    /// a live cell are dropped.
    pub fn pump(&mut self) -> usize {
        let changes = self.dispatcher.drain();
        for &VisibilityChange { position, visible } in &changes {
            if !self.grid.set_visibility(position, visible, &mut self.host) {
                trace!("Dropping posted visibility for empty position {position:?}");
            }
        }
        changes.len()
    }

    /// Applies a queued change through the matching setter.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Calendar::set_selected_dates`].
    pub fn apply(&mut self, change: ConfigChange) -> Result<(), CalendarError> {
        match change {
            ConfigChange::DisplayedMonth(month) => self.set_displayed_month(month),
            ConfigChange::FirstDayOfWeek(day) => self.set_first_day_of_week(day),
            ConfigChange::ShowWeekends(show) => self.set_show_weekends(show),
            ConfigChange::ShowDaysFromOtherMonths(show) => {
                self.set_show_days_from_other_months(show)
            }
            ConfigChange::SelectionMode(mode) => self.set_selection_mode(mode),
            ConfigChange::SelectedDates(dates) => self.set_selected_dates(dates)?,
        }
        Ok(())
    }

    fn reconcile(&mut self) {
        self.pump();

        let placements =
            compute_placements(self.config.displayed_month, &self.config.layout_options());
        let policy = self.selectable_dates.clone();
        let report = self.grid.reconcile(
            &placements,
            &mut self.host,
            self.cell_template.as_ref(),
            |date| is_date_selectable(date, &policy),
        );
        self.reapply_selection();

        debug!(
            "Reconciled {}: {} rows, {} visible updates",
            self.config.displayed_month,
            self.grid.row_count(),
            report.updated.len()
        );
        for position in report.updated {
            self.pending_events
                .retain(|event| !matches!(event, PendingEvent::Updated(p) if *p == position));
            self.pending_events.push_back(PendingEvent::Updated(position));
        }
        self.deliver_events();
    }

    fn reapply_selection(&mut self) {
        let changed = self.selection.apply(self.grid.records_mut());
        for position in changed {
            if let (Some(record), Some(handle)) =
                (self.grid.get(position), self.grid.handle(position))
            {
                self.host.cell_selection_changed(handle, record.is_selected());
            }
        }
    }

    fn refresh_headers(&mut self) {
        let headers = header_sequence(self.config.first_day_of_week, self.config.show_weekends);
        if headers == self.headers {
            return;
        }
        for column in headers.len()..self.headers.len() {
            self.host.remove_header_widget(column);
        }
        for (column, weekday) in headers.iter().enumerate() {
            if self.headers.get(column) != Some(weekday) {
                let template = self.header_template.as_ref();
                self.host.create_or_attach_header_widget(column, *weekday, template);
            }
        }
        debug!("Header sequence is now {headers:?}");
        self.headers = headers;
    }

    fn deliver_events(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some(pending) = self.pending_events.pop_front() {
            let event = match pending {
                PendingEvent::Tapped(record) => CalendarEvent::DayTapped(record),
                PendingEvent::Updated(position) => match self.grid.get(position) {
                    Some(record) if record.is_visible() => {
                        CalendarEvent::DayUpdated(record.clone())
                    }
                    _ => {
                        trace!("Skipping update for {position:?}, cell is gone or hidden");
                        continue;
                    }
                },
            };

            let mut commands = CalendarCommands::default();
            for listener in &mut self.listeners {
                listener(&event, &mut commands);
            }
            for change in commands.changes {
                if let Err(err) = self.apply(change) {
                    warn!("Discarding change queued by calendar listener: {err}");
                }
            }
        }
        self.dispatching = false;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, thread};

    use chrono::Datelike;

    use super::*;
    use crate::testing::{HostCall, RecordingHost};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn june_2023() -> CalendarConfig {
        CalendarConfig::default()
            .displayed_month(YearMonth::new(2023, 6).unwrap())
            .first_day_of_week(Weekday::Mon)
            .show_weekends(true)
            .show_days_from_other_months(true)
    }

    fn calendar(config: CalendarConfig) -> Calendar<RecordingHost> {
        Calendar::new(config, RecordingHost::default())
    }

    fn record_events(calendar: &mut Calendar<RecordingHost>) -> Rc<RefCell<Vec<CalendarEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        calendar.on_event(move |event, _| sink.borrow_mut().push(event.clone()));
        events
    }

    fn position_of(calendar: &Calendar<RecordingHost>, d: NaiveDate) -> CellPosition {
        calendar
            .cells()
            .find(|record| record.date() == d)
            .map(|record| record.position())
            .unwrap()
    }

    fn assert_headers_match_cells(calendar: &Calendar<RecordingHost>) {
        for record in calendar.cells() {
            assert_eq!(
                calendar.headers()[record.position().column],
                record.date().weekday()
            );
        }
        assert_eq!(calendar.host().headers(), calendar.headers());
    }

    #[test]
    fn june_2023_scenario() {
        let calendar = calendar(june_2023());
        assert_eq!(calendar.weeks_in_month(), 5);
        assert_eq!(calendar.days().count(), 35);

        let first_row: Vec<_> = calendar
            .days()
            .filter(|record| record.position().row == 0)
            .map(|record| record.date())
            .collect();
        assert_eq!(first_row.first(), Some(&date(2023, 5, 29)));
        assert_eq!(first_row.last(), Some(&date(2023, 6, 4)));
        assert_eq!(
            calendar.cell(CellPosition::new(0, 3)).unwrap().date(),
            date(2023, 6, 1)
        );
        assert_headers_match_cells(&calendar);
    }

    #[test]
    fn toggling_filler_visibility_keeps_identity() {
        let mut calendar = calendar(june_2023().show_days_from_other_months(false));
        let corner = CellPosition::new(0, 0);
        let before = calendar.cell(corner).unwrap().clone();
        assert!(!before.is_visible());
        assert_eq!(before.date(), date(2023, 5, 29));
        assert_eq!(calendar.days().count(), 30);

        calendar.set_show_days_from_other_months(true);
        let after = calendar.cell(corner).unwrap();
        assert!(after.is_visible());
        assert_eq!(after.id(), before.id());
        assert_eq!(calendar.host().visibility(corner), Some(true));
        assert_eq!(calendar.days().count(), 35);
    }

    #[test]
    fn weekend_round_trip_restores_columns() {
        let mut calendar = calendar(june_2023());
        let before: Vec<_> = calendar
            .cells()
            .map(|record| (record.date(), record.position(), record.id()))
            .collect();

        calendar.set_show_weekends(false);
        assert_eq!(calendar.headers().len(), 5);
        assert!(calendar.cells().all(|record| record.position().column < 5));
        assert_headers_match_cells(&calendar);

        calendar.set_show_weekends(true);
        let after: Vec<_> = calendar
            .cells()
            .map(|record| (record.date(), record.position(), record.id()))
            .collect();
        assert_eq!(before, after);
        assert_headers_match_cells(&calendar);
    }

    #[test]
    fn weekend_first_day_is_coerced_while_weekends_hidden() {
        let mut calendar = calendar(june_2023().show_weekends(false));
        calendar.set_first_day_of_week(Weekday::Sun);
        assert_eq!(calendar.config().first_day_of_week, Weekday::Mon);

        calendar.set_show_weekends(true);
        calendar.set_first_day_of_week(Weekday::Sat);
        assert_eq!(calendar.config().first_day_of_week, Weekday::Sat);
        assert_headers_match_cells(&calendar);

        calendar.set_show_weekends(false);
        assert_eq!(calendar.config().first_day_of_week, Weekday::Mon);
        assert_headers_match_cells(&calendar);
    }

    #[test]
    fn constructor_normalizes_config() {
        let config = june_2023()
            .first_day_of_week(Weekday::Sun)
            .show_weekends(false);
        let calendar = calendar(config);
        assert_eq!(calendar.config().first_day_of_week, Weekday::Mon);
    }

    #[test]
    fn single_select_rejects_two_dates() {
        let mut calendar = calendar(june_2023());
        calendar.set_selected_dates([date(2023, 6, 5)]).unwrap();

        let result = calendar.set_selected_dates([date(2023, 6, 6), date(2023, 6, 7)]);
        assert!(matches!(
            result,
            Err(CalendarError::InvalidConfiguration { requested: 2, .. })
        ));
        assert_eq!(
            calendar.selected_dates(),
            &BTreeSet::from([date(2023, 6, 5)])
        );
        let selected: Vec<_> = calendar
            .cells()
            .filter(|record| record.is_selected())
            .map(|record| record.date())
            .collect();
        assert_eq!(selected, vec![date(2023, 6, 5)]);
    }

    #[test]
    fn multi_select_tap_toggles() {
        let mut calendar = calendar(june_2023().selection_mode(SelectionMode::MultiSelect));
        let events = record_events(&mut calendar);
        let d1 = date(2023, 6, 14);
        let position = position_of(&calendar, d1);

        calendar.tap(position).unwrap();
        assert_eq!(calendar.selected_dates(), &BTreeSet::from([d1]));
        assert!(calendar.cell(position).unwrap().is_selected());
        assert_eq!(calendar.host().selected(position), Some(true));

        calendar.tap(position).unwrap();
        assert!(calendar.selected_dates().is_empty());
        assert!(!calendar.cell(position).unwrap().is_selected());
        assert_eq!(calendar.host().selected(position), Some(false));

        let taps: Vec<_> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                CalendarEvent::DayTapped(record) => Some(record.is_selected()),
                CalendarEvent::DayUpdated(_) => None,
            })
            .collect();
        assert_eq!(taps, vec![true, false]);
    }

    #[test]
    fn single_select_tap_moves_selection() {
        let mut calendar = calendar(june_2023());
        let first = position_of(&calendar, date(2023, 6, 1));
        let second = position_of(&calendar, date(2023, 6, 2));
        calendar.tap(first).unwrap();
        calendar.tap(second).unwrap();
        assert_eq!(
            calendar.selected_dates(),
            &BTreeSet::from([date(2023, 6, 2)])
        );
        assert!(!calendar.cell(first).unwrap().is_selected());
        assert!(calendar.cell(second).unwrap().is_selected());
    }

    #[test]
    fn tap_respects_selectable_policy() {
        struct NoWeekends;
        impl SelectableDates for NoWeekends {
            fn is_selectable_date(&self, date: NaiveDate) -> bool {
                !crate::date::is_weekend(date.weekday())
            }
        }

        let mut calendar = calendar(june_2023());
        let events = record_events(&mut calendar);
        calendar.set_selectable_dates(Arc::new(NoWeekends));

        let saturday = position_of(&calendar, date(2023, 6, 10));
        assert!(!calendar.cell(saturday).unwrap().is_selectable());
        calendar.tap(saturday).unwrap();
        assert!(calendar.selected_dates().is_empty());
        assert!(events.borrow().is_empty());

        calendar.tap(CellPosition::new(9, 9)).unwrap();
        assert!(calendar.selected_dates().is_empty());
    }

    #[test]
    fn year_policy_blocks_taps() {
        struct FromYear(i32);
        impl SelectableDates for FromYear {
            fn is_selectable_year(&self, year: i32) -> bool {
                year >= self.0
            }
        }

        let december_2024 = june_2023().displayed_month(YearMonth::new(2024, 12).unwrap());
        let mut calendar = calendar(december_2024);
        calendar.set_selectable_dates(Arc::new(FromYear(2025)));

        let december = position_of(&calendar, date(2024, 12, 20));
        assert!(!calendar.cell(december).unwrap().is_selectable());
        calendar.tap(december).unwrap();
        assert!(calendar.selected_dates().is_empty());

        // Trailing filler from January 2025 passes the policy.
        let january = position_of(&calendar, date(2025, 1, 1));
        assert!(calendar.cell(january).unwrap().is_selectable());
        calendar.tap(january).unwrap();
        assert_eq!(
            calendar.selected_dates(),
            &BTreeSet::from([date(2025, 1, 1)])
        );
    }

    #[test]
    fn selection_survives_navigation() {
        let mut calendar = calendar(june_2023());
        let d = date(2023, 6, 15);
        calendar.set_selected_dates([d]).unwrap();

        calendar.next_month();
        assert_eq!(
            calendar.config().displayed_month,
            YearMonth::new(2023, 7).unwrap()
        );
        assert!(calendar.cells().all(|record| !record.is_selected()));
        assert!(calendar.selected_dates().contains(&d));

        calendar.previous_month();
        let cell = calendar.cell(position_of(&calendar, d)).unwrap();
        assert!(cell.is_selected());
    }

    #[test]
    fn selection_mode_change_clears_cells() {
        let mut calendar = calendar(june_2023());
        let d = date(2023, 6, 20);
        calendar.set_selected_dates([d]).unwrap();
        let position = position_of(&calendar, d);
        calendar.host_mut().clear_calls();

        calendar.set_selection_mode(SelectionMode::MultiSelect);
        assert!(calendar.selected_dates().is_empty());
        assert!(!calendar.cell(position).unwrap().is_selected());
        assert_eq!(
            calendar.host().calls(),
            &[HostCall::Selection(position, false)]
        );
    }

    #[test]
    fn day_updated_fires_for_visible_changes_only() {
        let mut calendar = calendar(june_2023().show_days_from_other_months(false));
        let events = record_events(&mut calendar);

        calendar.next_month();
        let events = events.borrow();
        assert_eq!(events.len(), 31);
        assert!(events.iter().all(|event| {
            matches!(event, CalendarEvent::DayUpdated(record)
                if record.is_visible() && record.date().month() == 7)
        }));
    }

    #[test]
    fn revealed_filler_reports_dates_assigned_while_hidden() {
        let mut calendar = calendar(june_2023().show_days_from_other_months(false));
        calendar.next_month();
        let corner = CellPosition::new(0, 0);
        assert_eq!(calendar.cell(corner).unwrap().date(), date(2023, 6, 26));

        let events = record_events(&mut calendar);
        calendar.set_show_days_from_other_months(true);
        let revealed: Vec<_> = events
            .borrow()
            .iter()
            .map(|event| match event {
                CalendarEvent::DayUpdated(record) => record.date(),
                CalendarEvent::DayTapped(_) => panic!("unexpected tap"),
            })
            .collect();
        // June 26-30 lead July 2023, August 1-6 trail it.
        assert_eq!(revealed.len(), 11);
        assert_eq!(revealed.first(), Some(&date(2023, 6, 26)));
        assert_eq!(revealed.last(), Some(&date(2023, 8, 6)));

        events.borrow_mut().clear();
        calendar.set_show_days_from_other_months(false);
        calendar.set_show_days_from_other_months(true);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn day_updated_skips_identical_reconciles() {
        let mut calendar = calendar(june_2023());
        let events = record_events(&mut calendar);
        calendar.set_displayed_month(YearMonth::new(2023, 6).unwrap());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn listener_changes_apply_after_delivery() {
        let mut calendar = calendar(june_2023());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let mut requested = false;
        calendar.on_event(move |event, commands| {
            sink.borrow_mut().push(event.clone());
            if !requested {
                requested = true;
                commands.push(ConfigChange::ShowWeekends(false));
            }
        });

        calendar.next_month();
        assert!(!calendar.config().show_weekends);
        assert!(calendar.cells().all(|record| record.position().column < 5));
        assert_headers_match_cells(&calendar);

        // Every delivered update describes a cell that was live and visible
        // when it was delivered; nothing is reported twice.
        let events = events.borrow();
        let mut positions: Vec<_> = events.iter().map(|e| e.record().position()).collect();
        let total = positions.len();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), total);
        for event in events.iter().skip(1) {
            assert!(event.record().position().column < 5);
        }
    }

    #[test]
    fn failing_listener_change_is_discarded() {
        let mut calendar = calendar(june_2023());
        let mut fired = false;
        calendar.on_event(move |_, commands| {
            if !fired {
                fired = true;
                commands.push(ConfigChange::SelectedDates(BTreeSet::from([
                    date(2023, 7, 1),
                    date(2023, 7, 2),
                ])));
            }
        });
        calendar.next_month();
        assert!(calendar.selected_dates().is_empty());
        assert_eq!(
            calendar.config().displayed_month,
            YearMonth::new(2023, 7).unwrap()
        );
    }

    #[test]
    fn posted_visibility_applies_on_pump() {
        let mut calendar = calendar(june_2023());
        let poster = calendar.visibility_poster();
        let corner = CellPosition::new(0, 0);

        thread::spawn(move || {
            poster.post(corner, false);
            poster.post(CellPosition::new(8, 0), false);
        })
        .join()
        .unwrap();

        assert_eq!(calendar.pump(), 2);
        assert!(!calendar.cell(corner).unwrap().is_visible());
        assert_eq!(calendar.host().visibility(corner), Some(false));

        // The next reconcile puts the layout's visibility back.
        calendar.set_show_days_from_other_months(true);
        assert!(calendar.cell(corner).unwrap().is_visible());
        assert_eq!(calendar.host().visibility(corner), Some(true));
    }

    #[test]
    fn cell_template_reaches_new_widgets() {
        let february_2021 = june_2023().displayed_month(YearMonth::new(2021, 2).unwrap());
        let mut calendar = calendar(february_2021);
        assert_eq!(calendar.weeks_in_month(), 4);
        calendar.set_cell_template(Some("day".to_string()));
        calendar.set_displayed_month(YearMonth::new(2023, 7).unwrap());

        assert_eq!(calendar.host().template(CellPosition::new(0, 0)), None);
        let template = calendar.host().template(CellPosition::new(5, 0));
        assert_eq!(template, Some("day"));
    }

    #[test]
    fn header_template_recreates_headers() {
        let mut calendar = calendar(june_2023());
        calendar.host_mut().clear_calls();
        calendar.set_header_template(Some("header".to_string()));
        let headers = calendar
            .host()
            .calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Header(..)))
            .count();
        assert_eq!(headers, 7);
    }
}
