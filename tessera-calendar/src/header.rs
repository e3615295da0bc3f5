//! Weekday header sequence.
//!
//! The header sequence doubles as the column map of the day grid: a weekday's
//! column is its index in [`header_sequence`].
use chrono::Weekday;
use smallvec::SmallVec;

use crate::date::is_weekend;

/// Number of columns when weekends are shown.
pub const WEEK_COLUMNS: usize = 7;
/// Number of columns when weekends are hidden.
pub const WORK_WEEK_COLUMNS: usize = 5;

/// Ordered weekdays for the header row, one per column.
pub type HeaderSequence = SmallVec<[Weekday; WEEK_COLUMNS]>;

/// Returns the number of grid columns for the given weekend option.
pub fn column_count(show_weekends: bool) -> usize {
    if show_weekends {
        WEEK_COLUMNS
    } else {
        WORK_WEEK_COLUMNS
    }
}

/// Computes the weekday shown in each header column.
///
/// Starts at `first_day_of_week` and walks forward one day at a time. With
/// weekends hidden, Saturday and Sunday are skipped, so a weekend start
/// produces Monday through Friday.
pub fn header_sequence(first_day_of_week: Weekday, show_weekends: bool) -> HeaderSequence {
    let columns = column_count(show_weekends);
    let mut days = HeaderSequence::new();
    let mut day = first_day_of_week;
    while days.len() < columns {
        if show_weekends || !is_weekend(day) {
            days.push(day);
        }
        day = day.succ();
    }
    days
}

/// Short English label for a weekday.
pub fn weekday_short_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
