//! A [`CalendarHost`] that records every call, for tests.
use std::collections::{BTreeMap, HashMap};

use chrono::Weekday;

use crate::{host::CalendarHost, layout::CellPosition};

/// A call received by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `create_or_attach_cell_widget`
    Create(CellPosition),
    /// `set_cell_visibility`
    Visibility(CellPosition, bool),
    /// `destroy_cell_widget`
    Destroy(CellPosition),
    /// `create_or_attach_header_widget`
    Header(usize, Weekday),
    /// `remove_header_widget`
    RemoveHeader(usize),
    /// `cell_selection_changed`
    Selection(CellPosition, bool),
}

#[derive(Debug, Clone)]
struct Widget {
    position: CellPosition,
    visible: bool,
    selected: bool,
    template: Option<String>,
}

/// In-memory host keeping fake widgets keyed by handle.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    widgets: HashMap<usize, Widget>,
    headers: BTreeMap<usize, Weekday>,
    next_handle: usize,
}

impl RecordingHost {
    /// Every call received so far.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forgets the recorded calls, keeping the widgets.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of cell widgets that exist.
    pub fn live_cells(&self) -> usize {
        self.widgets.len()
    }

    /// Visibility of the widget at `position`.
    pub fn visibility(&self, position: CellPosition) -> Option<bool> {
        self.widget_at(position).map(|widget| widget.visible)
    }

    /// Selected flag last pushed to the widget at `position`.
    pub fn selected(&self, position: CellPosition) -> Option<bool> {
        self.widget_at(position).map(|widget| widget.selected)
    }

    /// Template the widget at `position` was created with.
    pub fn template(&self, position: CellPosition) -> Option<&str> {
        self.widget_at(position)
            .and_then(|widget| widget.template.as_deref())
    }

    /// Header weekdays in column order.
    pub fn headers(&self) -> Vec<Weekday> {
        self.headers.values().copied().collect()
    }

    fn widget_at(&self, position: CellPosition) -> Option<&Widget> {
        self.widgets
            .values()
            .find(|widget| widget.position == position)
    }
}

impl CalendarHost for RecordingHost {
    type CellHandle = usize;
    type Template = String;

    fn create_or_attach_cell_widget(
        &mut self,
        position: CellPosition,
        template: Option<&String>,
    ) -> usize {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.widgets.insert(
            handle,
            Widget {
                position,
                visible: false,
                selected: false,
                template: template.cloned(),
            },
        );
        self.calls.push(HostCall::Create(position));
        handle
    }

    fn set_cell_visibility(&mut self, handle: &usize, visible: bool) {
        if let Some(widget) = self.widgets.get_mut(handle) {
            widget.visible = visible;
            let call = HostCall::Visibility(widget.position, visible);
            self.calls.push(call);
        }
    }

    fn destroy_cell_widget(&mut self, handle: usize) {
        if let Some(widget) = self.widgets.remove(&handle) {
            self.calls.push(HostCall::Destroy(widget.position));
        }
    }

    fn create_or_attach_header_widget(
        &mut self,
        column: usize,
        weekday: Weekday,
        _template: Option<&String>,
    ) {
        self.headers.insert(column, weekday);
        self.calls.push(HostCall::Header(column, weekday));
    }

    fn remove_header_widget(&mut self, column: usize) {
        self.headers.remove(&column);
        self.calls.push(HostCall::RemoveHeader(column));
    }

    fn cell_selection_changed(&mut self, handle: &usize, selected: bool) {
        if let Some(widget) = self.widgets.get_mut(handle) {
            widget.selected = selected;
            let call = HostCall::Selection(widget.position, selected);
            self.calls.push(call);
        }
    }
}
