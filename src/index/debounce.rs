//! Change coalescing for rebuild scheduling.
//!
//! Individual create/change/delete notifications land in a pending set; a
//! single fixed-delay deadline covers the whole set. A notification arriving
//! while the deadline is armed neither resets nor duplicates it. The caller
//! polls the debouncer from its event loop and triggers a rebuild when a
//! batch comes due; if a rebuild is already active at that moment the batch
//! is dropped (see `WorkspaceSession::poll_debounce`).

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::base::DocumentId;

/// Default quiet period between the first change notification and the
/// rebuild it schedules.
pub const DEBOUNCE_DELAY: Duration = Duration::from_secs(1);

/// Pending change set plus the single rebuild deadline covering it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: FxHashSet<DocumentId>,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: FxHashSet::default(),
            deadline: None,
        }
    }

    /// Record a change notification. Arms the deadline only if none is
    /// armed; an already-armed deadline is left untouched.
    pub fn notify(&mut self, id: DocumentId, now: Instant) {
        self.pending.insert(id);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
    }

    /// Drain the pending set if the deadline has passed.
    ///
    /// Returns `None` while no deadline is armed or it has not yet elapsed.
    /// The pending set is cleared on drain regardless of what the caller
    /// does with it.
    pub fn poll(&mut self, now: Instant) -> Option<Vec<DocumentId>> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let mut drained: Vec<DocumentId> = self.pending.drain().collect();
        drained.sort();
        Some(drained)
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}
