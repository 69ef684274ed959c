//! Latest-request-wins gate for concurrent forecast calls.
//!
//! A caller takes a `Ticket` before starting a computation and offers the
//! result back with `publish`. Results from tickets older than the newest
//! published one are rejected, so a slow stale request can never overwrite a
//! fresher answer.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request token handed out by `LatestOnly::issue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Slot<T> {
    ticket: Option<Ticket>,
    value: Option<T>,
}

/// Holds the most recent result by ticket order.
#[derive(Debug)]
pub struct LatestOnly<T> {
    next: AtomicU64,
    slot: Mutex<Slot<T>>,
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestOnly<T> {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            slot: Mutex::new(Slot {
                ticket: None,
                value: None,
            }),
        }
    }

    /// Reserve a ticket for a computation that is about to start.
    pub fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Whether `ticket` is still the newest issued one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.next.load(Ordering::Relaxed) == ticket.0 + 1
    }

    /// Offer a result. Returns `false` and drops `value` when a newer ticket
    /// has already been published.
    pub fn publish(&self, ticket: Ticket, value: T) -> bool {
        let mut slot = match self.slot.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.ticket.is_some_and(|held| held > ticket) {
            tracing::debug!(
                stale = ticket.0,
                held = slot.ticket.map(Ticket::sequence),
                "dropping superseded result"
            );
            return false;
        }
        slot.ticket = Some(ticket);
        slot.value = Some(value);
        true
    }

    /// Ticket of the currently held value, if any.
    pub fn held(&self) -> Option<Ticket> {
        match self.slot.lock() {
            Ok(g) => g.ticket,
            Err(poisoned) => poisoned.into_inner().ticket,
        }
    }
}

impl<T: Clone> LatestOnly<T> {
    /// Clone of the freshest published value.
    pub fn latest(&self) -> Option<T> {
        match self.slot.lock() {
            Ok(g) => g.value.clone(),
            Err(poisoned) => poisoned.into_inner().value.clone(),
        }
    }
}
