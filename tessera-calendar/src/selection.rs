//! Selection state machine.
//!
//! The selection is a set of dates, not of cells, so it survives month
//! navigation. It only shows on cells that are live and carry a matching
//! date.
use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::{error::CalendarError, grid::CellRecord, layout::CellPosition};

/// How many dates may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// At most one date.
    #[default]
    SingleSelect,
    /// Any number of dates; taps toggle.
    MultiSelect,
}

/// Owns the selected dates and the selection mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    mode: SelectionMode,
    selected: BTreeSet<NaiveDate>,
}

impl SelectionController {
    /// Creates an empty selection in `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: BTreeSet::new(),
        }
    }

    /// Current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Currently selected dates.
    pub fn selected_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.selected
    }

    /// Returns true when `date` is selected.
    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.selected.contains(&date)
    }

    /// Switches the mode. Always clears the selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        debug!(
            "Selection mode set to {mode:?}, clearing {} dates",
            self.selected.len()
        );
        self.mode = mode;
        self.selected.clear();
    }

    /// Replaces the selected dates.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidConfiguration`] when more than one date
    /// is requested in [`SelectionMode::SingleSelect`]. The selection is left
    /// untouched in that case.
    pub fn set_selected_dates(&mut self, dates: BTreeSet<NaiveDate>) -> Result<(), CalendarError> {
        if self.mode == SelectionMode::SingleSelect && dates.len() > 1 {
            return Err(CalendarError::InvalidConfiguration {
                mode: self.mode,
                requested: dates.len(),
            });
        }
        self.selected = dates;
        Ok(())
    }

    /// Applies a tap on `record`.
    ///
    /// Returns `Ok(false)` when the cell is not selectable and nothing
    /// changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`SelectionController::set_selected_dates`].
    pub fn on_tap(&mut self, record: &CellRecord) -> Result<bool, CalendarError> {
        if !record.is_selectable() {
            return Ok(false);
        }
        let date = record.date();
        let next = match self.mode {
            SelectionMode::SingleSelect => BTreeSet::from([date]),
            SelectionMode::MultiSelect => {
                let mut next = self.selected.clone();
                if !next.remove(&date) {
                    next.insert(date);
                }
                next
            }
        };
        self.set_selected_dates(next)?;
        Ok(true)
    }

    /// Marks every record whose date is selected and clears the rest.
    ///
    /// Returns the positions whose selected flag flipped.
    pub fn apply<'a>(
        &self,
        records: impl IntoIterator<Item = &'a mut CellRecord>,
    ) -> Vec<CellPosition> {
        records
            .into_iter()
            .filter_map(|record| {
                let selected = self.selected.contains(&record.date());
                record.set_selected(selected).then(|| record.position())
            })
            .collect()
    }
}
