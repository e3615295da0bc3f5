//! Error types for the calendar engine.

use crate::selection::SelectionMode;

/// Errors surfaced synchronously by calendar setters.
///
/// A failed call leaves every piece of calendar state as it was before the
/// call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The requested selection is not allowed in the current selection mode.
    #[error("invalid configuration: {mode:?} accepts at most one selected date, got {requested}")]
    InvalidConfiguration {
        /// Selection mode that rejected the request.
        mode: SelectionMode,
        /// Number of dates in the rejected request.
        requested: usize,
    },
}
