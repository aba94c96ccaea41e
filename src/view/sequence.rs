//! Latest-wins fetch sequencing.
//!
//! Rapid filter toggling can put several fetches in flight at once, and the
//! slowest response is not necessarily the newest. Every fetch takes a
//! ticket from a monotonic counter before it starts; a completion lands only
//! if its ticket is still the newest issued. A stale response that loses the
//! race is dropped, never applied over fresher data.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket identifying one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A slot holding the newest successfully applied value.
#[derive(Debug, Default)]
pub struct Latest<T> {
    issued: AtomicU64,
    slot: RwLock<Option<(u64, T)>>,
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: RwLock::new(None),
        }
    }

    /// Take a ticket for a fetch that is about to start. Issuing alone
    /// supersedes every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Apply a completed fetch. Returns false (and drops `value`) if a newer
    /// ticket has been issued since this one, or if a newer value already
    /// landed.
    pub fn complete(&self, ticket: Ticket, value: T) -> bool {
        if ticket.0 != self.issued.load(Ordering::SeqCst) {
            return false;
        }
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        match *slot {
            Some((applied, _)) if applied >= ticket.0 => false,
            _ => {
                *slot = Some((ticket.0, value));
                true
            }
        }
    }

    /// Whether `ticket` is still the newest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued.load(Ordering::SeqCst)
    }
}

impl<T: Clone> Latest<T> {
    pub fn current(&self) -> Option<T> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|(_, value)| value.clone())
    }
}
