//! Month grid engine for tessera calendar views.
//!
//! This crate does not draw anything. It decides which dates go into which
//! cells of a month grid, keeps those cells alive across navigation, and
//! tracks the selected dates. Widgets are created and destroyed by the view
//! layer through the [`CalendarHost`] trait.
//!
//! # Usage
//!
//! ```
//! use tessera_calendar::{
//!     Calendar, CalendarConfig, CalendarHost, CellPosition, NaiveDate, SelectionMode, Weekday,
//!     YearMonth,
//! };
//!
//! #[derive(Default)]
//! struct Widgets {
//!     next: usize,
//! }
//!
//! impl CalendarHost for Widgets {
//!     type CellHandle = usize;
//!     type Template = ();
//!
//!     fn create_or_attach_cell_widget(&mut self, _: CellPosition, _: Option<&()>) -> usize {
//!         self.next += 1;
//!         self.next
//!     }
//!     fn set_cell_visibility(&mut self, _: &usize, _: bool) {}
//!     fn destroy_cell_widget(&mut self, _: usize) {}
//!     fn create_or_attach_header_widget(&mut self, _: usize, _: Weekday, _: Option<&()>) {}
//! }
//!
//! let config = CalendarConfig::default()
//!     .displayed_month(YearMonth::new(2023, 6).unwrap())
//!     .first_day_of_week(Weekday::Mon)
//!     .selection_mode(SelectionMode::MultiSelect);
//! let mut calendar = Calendar::new(config, Widgets::default());
//!
//! assert_eq!(calendar.weeks_in_month(), 5);
//! let first = calendar.cell(CellPosition::new(0, 3)).unwrap();
//! assert_eq!(first.date(), NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
//!
//! calendar.tap(CellPosition::new(0, 3)).unwrap();
//! assert!(calendar.cell(CellPosition::new(0, 3)).unwrap().is_selected());
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `layout` | Date to `(row, column)` placement |
//! | `header` | Weekday header sequence, shared with the layout's columns |
//! | `grid` | Live cell records with stable identity |
//! | `selection` | Single and multi select state machine |
//! | `calendar` | The engine running the reconcile pipeline |
//! | `dispatch` | Visibility changes posted from other threads |

mod calendar;
mod config;
mod date;
mod dispatch;
mod error;
mod grid;
mod header;
mod host;
mod layout;
mod selection;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use calendar::{Calendar, CalendarCommands, ConfigChange};
pub use chrono::{NaiveDate, Weekday};
pub use config::{CalendarConfig, CalendarDefaults, SelectableDates, normalize_first_day_of_week};
pub use date::{YearMonth, is_weekend, weekday_distance};
pub use dispatch::{VisibilityChange, VisibilityPoster};
pub use error::CalendarError;
pub use grid::{CellId, CellRecord, GridSynchronizer, SyncReport};
pub use header::{
    HeaderSequence, WEEK_COLUMNS, WORK_WEEK_COLUMNS, column_count, header_sequence,
    weekday_short_label,
};
pub use host::{CalendarEvent, CalendarHost};
pub use layout::{
    CellPosition, LayoutOptions, Placement, column_for, compute_placements, leading_offset,
    weeks_in_month,
};
pub use selection::{SelectionController, SelectionMode};
