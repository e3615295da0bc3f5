use std::{collections::BTreeMap, fmt::Write as _};

use chrono::Datelike as _;
use tessera_calendar::{Calendar, CalendarHost, CellPosition, Weekday, weekday_short_label};
use tracing::trace;

/// Host that only keeps track of which widget handles exist.
#[derive(Debug, Default)]
pub struct TerminalHost {
    widgets: BTreeMap<usize, CellPosition>,
    next_handle: usize,
}

impl TerminalHost {
    /// Number of cell widgets currently alive.
    pub fn live_widgets(&self) -> usize {
        self.widgets.len()
    }
}

impl CalendarHost for TerminalHost {
    type CellHandle = usize;
    type Template = ();

    fn create_or_attach_cell_widget(
        &mut self,
        position: CellPosition,
        _template: Option<&()>,
    ) -> usize {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.widgets.insert(handle, position);
        trace!("Widget {handle} created for {position:?}");
        handle
    }

    fn set_cell_visibility(&mut self, handle: &usize, visible: bool) {
        trace!("Widget {handle} visible: {visible}");
    }

    fn destroy_cell_widget(&mut self, handle: usize) {
        self.widgets.remove(&handle);
        trace!("Widget {handle} destroyed");
    }

    fn create_or_attach_header_widget(
        &mut self,
        column: usize,
        weekday: Weekday,
        _template: Option<&()>,
    ) {
        trace!("Header {column} shows {weekday:?}");
    }
}

/// Renders the calendar as text: a title line, the header row, then one line
/// per week. Selected days carry a `*`.
pub fn render(calendar: &Calendar<TerminalHost>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", calendar.config().displayed_month);

    let mut line = String::new();
    for weekday in calendar.headers() {
        let _ = write!(line, " {:>3} ", weekday_short_label(*weekday));
    }
    let _ = writeln!(out, "{}", line.trim_end());

    for row in 0..calendar.weeks_in_month() {
        line.clear();
        for column in 0..calendar.headers().len() {
            match calendar.cell(CellPosition::new(row, column)) {
                Some(record) if record.is_visible() => {
                    let day = record.date().day();
                    if record.is_selected() {
                        let _ = write!(line, " {day:>3}*");
                    } else {
                        let _ = write!(line, " {day:>3} ");
                    }
                }
                _ => line.push_str("     "),
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}
