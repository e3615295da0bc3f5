//! Cross-thread visibility posting.
//!
//! Calendar state lives on one thread. Code running elsewhere (an animation
//! driver, a loader) uses a [`VisibilityPoster`] to queue visibility changes;
//! the owning thread applies them in posting order the next time the calendar
//! pumps or reconciles.
use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use crate::layout::CellPosition;

/// One queued visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    /// Cell slot the change targets.
    pub position: CellPosition,
    /// Requested visibility.
    pub visible: bool,
}

type Queue = Arc<Mutex<VecDeque<VisibilityChange>>>;

/// Sending half handed to other threads.
#[derive(Debug, Clone, Default)]
pub struct VisibilityPoster {
    queue: Queue,
}

impl VisibilityPoster {
    /// Queues a visibility change for the owning thread.
    pub fn post(&self, position: CellPosition, visible: bool) {
        self.queue
            .lock()
            .push_back(VisibilityChange { position, visible });
    }
}

/// Receiving half kept by the calendar.
#[derive(Debug, Default)]
pub(crate) struct VisibilityDispatcher {
    queue: Queue,
}

impl VisibilityDispatcher {
    pub(crate) fn poster(&self) -> VisibilityPoster {
        VisibilityPoster {
            queue: self.queue.clone(),
        }
    }

    /// Takes every pending change, oldest first.
    pub(crate) fn drain(&self) -> Vec<VisibilityChange> {
        self.queue.lock().drain(..).collect()
    }
}
