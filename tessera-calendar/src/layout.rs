//! Date-to-grid layout.
//!
//! Maps every date that belongs in a month view to a `(row, column)` slot.
//! Rows are weeks starting at the configured first day of the week; columns
//! follow [`header_sequence`], so the header row and the day grid always agree
//! on which weekday owns a column.
//!
//! Partial first and last weeks are completed with filler days from the
//! neighbouring months. Filler placements always exist so cell identity stays
//! stable; their `visible` flag follows `show_days_from_other_months`.
use chrono::{Datelike, NaiveDate, Weekday};

use crate::{
    date::{YearMonth, weekday_distance},
    header::{HeaderSequence, WEEK_COLUMNS, header_sequence},
};

/// Options that influence where dates land in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Weekday placed in the first column.
    pub first_day_of_week: Weekday,
    /// Whether Saturday and Sunday get columns.
    pub show_weekends: bool,
    /// Whether filler days from neighbouring months are visible.
    pub show_days_from_other_months: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Mon,
            show_weekends: true,
            show_days_from_other_months: true,
        }
    }
}

/// A grid slot. Ordered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPosition {
    /// Week row, starting at 0.
    pub row: usize,
    /// Weekday column, starting at 0.
    pub column: usize,
}

impl CellPosition {
    /// Creates a position.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// One date assigned to one grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Date shown in the slot.
    pub date: NaiveDate,
    /// Slot the date occupies.
    pub position: CellPosition,
    /// False for suppressed filler days.
    pub visible: bool,
}

/// Number of week rows needed to show `month`.
pub fn weeks_in_month(month: YearMonth, first_day_of_week: Weekday) -> usize {
    let offset = leading_offset(month, first_day_of_week);
    week_of_month(offset, month.days_in_month()) + 1
}

/// Column of `weekday`, or `None` when the weekday has no column.
pub fn column_for(
    weekday: Weekday,
    first_day_of_week: Weekday,
    show_weekends: bool,
) -> Option<usize> {
    header_sequence(first_day_of_week, show_weekends)
        .iter()
        .position(|day| *day == weekday)
}

/// Computes the placements for `month`, ordered by date.
pub fn compute_placements(month: YearMonth, options: &LayoutOptions) -> Vec<Placement> {
    let headers = header_sequence(options.first_day_of_week, options.show_weekends);
    let columns = ColumnMap::new(headers);
    let first = month.first_day();
    let last = month.last_day();
    let days = month.days_in_month();
    let offset = leading_offset(month, options.first_day_of_week);
    let last_row = week_of_month(offset, days);

    let mut placements = Vec::with_capacity((last_row + 1) * WEEK_COLUMNS);

    let mut leading = Vec::new();
    let mut date = first;
    while date.weekday() != options.first_day_of_week {
        let Some(previous) = date.pred_opt() else {
            break;
        };
        date = previous;
        if let Some(column) = columns.get(date.weekday()) {
            leading.push(Placement {
                date,
                position: CellPosition::new(0, column),
                visible: options.show_days_from_other_months,
            });
        }
    }
    placements.extend(leading.into_iter().rev());

    for (day, date) in (1..=days).zip(first.iter_days()) {
        if let Some(column) = columns.get(date.weekday()) {
            placements.push(Placement {
                date,
                position: CellPosition::new(week_of_month(offset, day), column),
                visible: true,
            });
        }
    }

    let last_weekday = options.first_day_of_week.pred();
    let mut date = last;
    while date.weekday() != last_weekday {
        let Some(next) = date.succ_opt() else {
            break;
        };
        date = next;
        if let Some(column) = columns.get(date.weekday()) {
            placements.push(Placement {
                date,
                position: CellPosition::new(last_row, column),
                visible: options.show_days_from_other_months,
            });
        }
    }

    placements
}

/// Weekday distance from the first day of the week to day 1 of `month`.
pub fn leading_offset(month: YearMonth, first_day_of_week: Weekday) -> usize {
    weekday_distance(first_day_of_week, month.first_day().weekday()) as usize
}

fn week_of_month(offset: usize, day: u32) -> usize {
    (offset + day as usize - 1) / WEEK_COLUMNS
}

/// Weekday to column lookup built once per layout pass.
struct ColumnMap([Option<usize>; WEEK_COLUMNS]);

impl ColumnMap {
    fn new(headers: HeaderSequence) -> Self {
        let mut map = [None; WEEK_COLUMNS];
        for (column, day) in headers.iter().enumerate() {
            map[day.num_days_from_monday() as usize] = Some(column);
        }
        Self(map)
    }

    fn get(&self, weekday: Weekday) -> Option<usize> {
        self.0[weekday.num_days_from_monday() as usize]
    }
}
