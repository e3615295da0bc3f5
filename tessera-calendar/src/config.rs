//! Calendar configuration and the selectable-dates policy.
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use derive_setters::Setters;

use crate::{
    date::{YearMonth, is_weekend},
    layout::LayoutOptions,
    selection::SelectionMode,
};

/// Controls which dates can be selected by tapping.
pub trait SelectableDates: Send + Sync {
    /// Returns true when the date can be selected.
    fn is_selectable_date(&self, _date: NaiveDate) -> bool {
        true
    }

    /// Returns true when the year can be selected.
    fn is_selectable_year(&self, _year: i32) -> bool {
        true
    }
}

struct AllDates;

impl SelectableDates for AllDates {}

/// Defaults for calendar behavior.
pub struct CalendarDefaults;

impl CalendarDefaults {
    /// Default first day of the week.
    pub const FIRST_DAY_OF_WEEK: Weekday = Weekday::Mon;

    /// Returns a selectable-dates policy that allows every date.
    pub fn all_dates() -> Arc<dyn SelectableDates> {
        Arc::new(AllDates)
    }
}

pub(crate) fn is_date_selectable(date: NaiveDate, policy: &Arc<dyn SelectableDates>) -> bool {
    policy.is_selectable_year(date.year()) && policy.is_selectable_date(date)
}

/// Display and selection options owned by a [`Calendar`](crate::Calendar).
///
/// Used to seed a calendar; afterwards the calendar's setters are the only
/// way to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
pub struct CalendarConfig {
    /// Month shown by the grid.
    pub displayed_month: YearMonth,
    /// Weekday placed in the first column.
    pub first_day_of_week: Weekday,
    /// Whether Saturday and Sunday get columns.
    pub show_weekends: bool,
    /// Whether filler days from neighbouring months are visible.
    pub show_days_from_other_months: bool,
    /// Single or multi select.
    pub selection_mode: SelectionMode,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            displayed_month: YearMonth::current(),
            first_day_of_week: CalendarDefaults::FIRST_DAY_OF_WEEK,
            show_weekends: true,
            show_days_from_other_months: true,
            selection_mode: SelectionMode::default(),
        }
    }
}

impl CalendarConfig {
    /// Returns the config with a weekend first day coerced to Monday when
    /// weekends are hidden.
    pub fn normalized(mut self) -> Self {
        self.first_day_of_week =
            normalize_first_day_of_week(self.first_day_of_week, self.show_weekends);
        self
    }

    /// Returns the options consumed by the layout algorithm.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            first_day_of_week: self.first_day_of_week,
            show_weekends: self.show_weekends,
            show_days_from_other_months: self.show_days_from_other_months,
        }
    }
}

/// Coerces a weekend first day to Monday when weekends are hidden.
pub fn normalize_first_day_of_week(first_day_of_week: Weekday, show_weekends: bool) -> Weekday {
    if !show_weekends && is_weekend(first_day_of_week) {
        Weekday::Mon
    } else {
        first_day_of_week
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_chain_from_default() {
        let month = YearMonth::new(2023, 6).unwrap();
        let config = CalendarConfig::default()
            .displayed_month(month)
            .first_day_of_week(Weekday::Sun)
            .show_weekends(false);
        assert_eq!(config.displayed_month, month);
        assert_eq!(config.first_day_of_week, Weekday::Sun);
        assert!(!config.show_weekends);
        assert!(config.show_days_from_other_months);
    }

    #[test]
    fn normalized_coerces_weekend_start_only_when_weekends_hidden() {
        let hidden = CalendarConfig::default()
            .first_day_of_week(Weekday::Sat)
            .show_weekends(false)
            .normalized();
        assert_eq!(hidden.first_day_of_week, Weekday::Mon);

        let shown = CalendarConfig::default()
            .first_day_of_week(Weekday::Sun)
            .normalized();
        assert_eq!(shown.first_day_of_week, Weekday::Sun);

        let weekday = CalendarConfig::default()
            .first_day_of_week(Weekday::Wed)
            .show_weekends(false)
            .normalized();
        assert_eq!(weekday.first_day_of_week, Weekday::Wed);
    }

    #[test]
    fn default_policy_allows_everything() {
        let policy = CalendarDefaults::all_dates();
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert!(is_date_selectable(date, &policy));
    }
}
