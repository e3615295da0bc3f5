//! The seam between the engine and the view layer that draws it.
use chrono::Weekday;

use crate::{grid::CellRecord, layout::CellPosition};

/// View-layer collaborator that owns the actual widgets.
///
/// The engine only decides *which* cells exist and what they show; the host
/// creates, shows, hides and destroys the widgets backing them. All calls
/// happen on the thread that owns the [`Calendar`](crate::Calendar).
pub trait CalendarHost {
    /// Host-side handle for one day cell widget.
    type CellHandle;
    /// Opaque template passed through to widget creation.
    type Template;

    /// Creates a widget for `position`, or re-attaches one the host kept
    /// around, and returns its handle.
    fn create_or_attach_cell_widget(
        &mut self,
        position: CellPosition,
        template: Option<&Self::Template>,
    ) -> Self::CellHandle;

    /// Shows or hides a cell widget.
    fn set_cell_visibility(&mut self, handle: &Self::CellHandle, visible: bool);

    /// Destroys a cell widget whose position left the grid.
    fn destroy_cell_widget(&mut self, handle: Self::CellHandle);

    /// Creates or re-attaches the header widget of `column`.
    fn create_or_attach_header_widget(
        &mut self,
        column: usize,
        weekday: Weekday,
        template: Option<&Self::Template>,
    );

    /// Removes the header widget of a column that no longer exists.
    fn remove_header_widget(&mut self, _column: usize) {}

    /// Called when a live cell's selected flag flips.
    fn cell_selection_changed(&mut self, _handle: &Self::CellHandle, _selected: bool) {}
}

/// Notifications delivered to listeners registered with
/// [`Calendar::on_event`](crate::Calendar::on_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    /// A selectable cell was tapped. Carries the record after the selection
    /// update.
    DayTapped(CellRecord),
    /// A visible cell was created or now shows a different date.
    DayUpdated(CellRecord),
}

impl CalendarEvent {
    /// The cell the event is about.
    pub fn record(&self) -> &CellRecord {
        match self {
            CalendarEvent::DayTapped(record) | CalendarEvent::DayUpdated(record) => record,
        }
    }
}
