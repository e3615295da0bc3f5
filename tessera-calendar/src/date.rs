//! Month and weekday arithmetic shared by the layout and header code.
use chrono::{Datelike, Local, NaiveDate, Weekday};

/// A year and month pair used for month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year/month pair if the values are valid.
    ///
    /// Returns `None` for months outside `1..=12` and for years that cannot
    /// hold a complete month of [`NaiveDate`] values.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let candidate = Self { year, month };
        candidate.checked_first_day()?;
        candidate.checked_last_day()?;
        Some(candidate)
    }

    /// Returns the month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the month containing today's local date.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Adds or subtracts months, adjusting the year as needed.
    ///
    /// Saturates at the edges of the representable date range.
    pub fn add_months(&self, delta: i32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) + delta as i64;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u32;
        i32::try_from(year)
            .ok()
            .and_then(|year| Self::new(year, month))
            .unwrap_or(*self)
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.checked_first_day().unwrap_or(NaiveDate::MIN)
    }

    /// Returns the last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.checked_last_day().unwrap_or(NaiveDate::MAX)
    }

    /// Returns the number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Returns true when `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn checked_first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn checked_last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year.checked_add(1)?, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
    }
}

impl Default for YearMonth {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Returns true for Saturday and Sunday.
pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Cyclic distance in days from `from` forward to `to`, in `0..7`.
pub fn weekday_distance(from: Weekday, to: Weekday) -> u32 {
    (to.num_days_from_monday() + 7 - from.num_days_from_monday()) % 7
}
