//! Ordering of background results.
//!
//! Work handed to other threads is tagged with a [`Ticket`]. Completions may
//! arrive in any order; [`LatestWins`] only lets through tickets newer than the
//! last one applied, so a slow, superseded request never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// Hands out strictly increasing tickets. Shareable across threads.
#[derive(Debug)]
pub struct Sequencer {
    next: AtomicU64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LatestWins {
    applied: Option<Ticket>,
}

impl LatestWins {
    /// Records `ticket` and returns true if it is newer than anything accepted so far.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        match self.applied {
            Some(applied) if ticket <= applied => false,
            _ => {
                self.applied = Some(ticket);
                true
            }
        }
    }

    pub fn applied(&self) -> Option<Ticket> {
        self.applied
    }
}
