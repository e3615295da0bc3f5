//! Live cell bookkeeping.
//!
//! [`GridSynchronizer`] keeps one [`CellRecord`] per occupied grid slot and
//! brings that set in line with a fresh layout pass. Records are updated in
//! place so their [`CellId`] survives month navigation and option changes.
//! Records whose slot leaves the grid are detached (their widget is
//! destroyed) but retained by position, and come back with the same identity
//! when the slot is needed again.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::{
    host::CalendarHost,
    layout::{CellPosition, Placement},
};

/// Stable identity of a cell record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    /// Raw identifier value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The engine's view of one day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    id: CellId,
    position: CellPosition,
    date: NaiveDate,
    visible: bool,
    selectable: bool,
    selected: bool,
}

impl CellRecord {
    fn new(id: CellId, placement: &Placement, selectable: bool) -> Self {
        Self {
            id,
            position: placement.position,
            date: placement.date,
            visible: placement.visible,
            selectable,
            selected: false,
        }
    }

    /// Identity of the record.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Grid slot of the record.
    pub fn position(&self) -> CellPosition {
        self.position
    }

    /// Date currently shown.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether the cell is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether tapping the cell changes the selection.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Whether the cell's date is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) -> bool {
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }
}

/// What a [`GridSynchronizer::reconcile`] pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Slots that got a brand new record.
    pub created: Vec<CellPosition>,
    /// Slots whose retained record was attached again.
    pub reattached: Vec<CellPosition>,
    /// Visible slots that were created, re-attached or show a date not yet
    /// reported while visible.
    pub updated: Vec<CellPosition>,
    /// Slots whose record was detached.
    pub detached: Vec<CellPosition>,
}

struct LiveCell<T> {
    record: CellRecord,
    handle: T,
    /// Date last reported to listeners while the cell was visible.
    reported_date: Option<NaiveDate>,
}

/// Owns the live cell records and the host handles backing them.
pub struct GridSynchronizer<T> {
    live: BTreeMap<CellPosition, LiveCell<T>>,
    retained: HashMap<CellPosition, CellRecord>,
    row_count: usize,
    next_id: u64,
}

impl<T> Default for GridSynchronizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GridSynchronizer<T> {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self {
            live: BTreeMap::new(),
            retained: HashMap::new(),
            row_count: 0,
            next_id: 0,
        }
    }

    /// Number of week rows currently allocated.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true when no record is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of detached records kept for re-attachment.
    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Live record at `position`.
    pub fn get(&self, position: CellPosition) -> Option<&CellRecord> {
        self.live.get(&position).map(|cell| &cell.record)
    }

    /// Host handle of the live record at `position`.
    pub fn handle(&self, position: CellPosition) -> Option<&T> {
        self.live.get(&position).map(|cell| &cell.handle)
    }

    /// Live records in row-major order.
    pub fn records(&self) -> impl Iterator<Item = &CellRecord> {
        self.live.values().map(|cell| &cell.record)
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut CellRecord> {
        self.live.values_mut().map(|cell| &mut cell.record)
    }

    /// Brings the live records in line with `placements`.
    ///
    /// `selectable` decides the selectable flag of every placed date.
    pub fn reconcile<H>(
        &mut self,
        placements: &[Placement],
        host: &mut H,
        template: Option<&H::Template>,
        selectable: impl Fn(NaiveDate) -> bool,
    ) -> SyncReport
    where
        H: CalendarHost<CellHandle = T>,
    {
        let mut report = SyncReport::default();
        let desired: BTreeSet<CellPosition> = placements.iter().map(|p| p.position).collect();
        let desired_rows = desired.iter().map(|p| p.row + 1).max().unwrap_or(0);

        while self.row_count < desired_rows {
            self.append_row(&desired, host, template, &mut report);
        }
        while self.row_count > desired_rows {
            self.remove_last_row(host, &mut report);
        }

        let stale: Vec<CellPosition> = self
            .live
            .keys()
            .filter(|position| !desired.contains(position))
            .copied()
            .collect();
        for position in stale {
            self.detach(position, host, &mut report);
        }

        for placement in placements {
            let position = placement.position;
            if !self.live.contains_key(&position) {
                if self.retained.contains_key(&position) {
                    self.reattach(position, host, template, &mut report);
                } else {
                    self.create(placement, host, template, &selectable, &mut report);
                }
            }

            let fresh = report.created.contains(&position) || report.reattached.contains(&position);
            let Some(cell) = self.live.get_mut(&position) else {
                continue;
            };
            let record = &mut cell.record;
            let visibility_changed = record.visible != placement.visible;
            record.date = placement.date;
            record.visible = placement.visible;
            record.selectable = selectable(placement.date);

            if visibility_changed || fresh {
                host.set_cell_visibility(&cell.handle, placement.visible);
            }
            // A date assigned while hidden is reported once the cell shows.
            if placement.visible && (fresh || cell.reported_date != Some(placement.date)) {
                trace!("Cell {position:?} now shows {}", placement.date);
                cell.reported_date = Some(placement.date);
                report.updated.push(position);
            }
        }

        debug!(
            "Grid synchronized: {} rows, {} live, {} created, {} reattached, {} detached",
            self.row_count,
            self.live.len(),
            report.created.len(),
            report.reattached.len(),
            report.detached.len()
        );
        report
    }

    /// Applies a visibility change to the live record at `position`.
    ///
    /// Returns false when no record lives there.
    pub fn set_visibility<H>(&mut self, position: CellPosition, visible: bool, host: &mut H) -> bool
    where
        H: CalendarHost<CellHandle = T>,
    {
        let Some(cell) = self.live.get_mut(&position) else {
            return false;
        };
        if cell.record.visible != visible {
            cell.record.visible = visible;
            host.set_cell_visibility(&cell.handle, visible);
        }
        true
    }

    fn append_row<H>(
        &mut self,
        desired: &BTreeSet<CellPosition>,
        host: &mut H,
        template: Option<&H::Template>,
        report: &mut SyncReport,
    ) where
        H: CalendarHost<CellHandle = T>,
    {
        let row = self.row_count;
        self.row_count += 1;
        let mut returning: Vec<CellPosition> = self
            .retained
            .keys()
            .filter(|position| position.row == row && desired.contains(position))
            .copied()
            .collect();
        returning.sort();
        for position in returning {
            self.reattach(position, host, template, report);
        }
        debug!("Appended grid row {row}");
    }

    fn remove_last_row<H>(&mut self, host: &mut H, report: &mut SyncReport)
    where
        H: CalendarHost<CellHandle = T>,
    {
        let Some(row) = self.row_count.checked_sub(1) else {
            return;
        };
        let doomed: Vec<CellPosition> = self
            .live
            .keys()
            .filter(|position| position.row == row)
            .copied()
            .collect();
        for position in doomed {
            self.detach(position, host, report);
        }
        self.row_count = row;
        debug!("Removed grid row {row}");
    }

    fn create<H>(
        &mut self,
        placement: &Placement,
        host: &mut H,
        template: Option<&H::Template>,
        selectable: &impl Fn(NaiveDate) -> bool,
        report: &mut SyncReport,
    ) where
        H: CalendarHost<CellHandle = T>,
    {
        let id = CellId(self.next_id);
        self.next_id += 1;
        let record = CellRecord::new(id, placement, selectable(placement.date));
        let handle = host.create_or_attach_cell_widget(placement.position, template);
        trace!("Created cell {id:?} at {:?}", placement.position);
        self.live.insert(
            placement.position,
            LiveCell {
                record,
                handle,
                reported_date: None,
            },
        );
        report.created.push(placement.position);
    }

    fn reattach<H>(
        &mut self,
        position: CellPosition,
        host: &mut H,
        template: Option<&H::Template>,
        report: &mut SyncReport,
    ) where
        H: CalendarHost<CellHandle = T>,
    {
        let Some(record) = self.retained.remove(&position) else {
            return;
        };
        let handle = host.create_or_attach_cell_widget(position, template);
        trace!("Reattached cell {:?} at {position:?}", record.id);
        self.live.insert(
            position,
            LiveCell {
                record,
                handle,
                reported_date: None,
            },
        );
        report.reattached.push(position);
    }

    fn detach<H>(&mut self, position: CellPosition, host: &mut H, report: &mut SyncReport)
    where
        H: CalendarHost<CellHandle = T>,
    {
        let Some(cell) = self.live.remove(&position) else {
            return;
        };
        let mut record = cell.record;
        host.destroy_cell_widget(cell.handle);
        record.selected = false;
        trace!("Detached cell {:?} at {position:?}", record.id);
        self.retained.insert(position, record);
        report.detached.push(position);
    }
}
