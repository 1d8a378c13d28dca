//! Request sequencing for asynchronous resolutions
//!
//! Every search or geocode request takes a `Ticket` when issued. Only the
//! most recently issued ticket may apply its result, and only once; anything
//! older is stale and dropped. Issuing a new ticket also aborts the task
//! still working on the previous one.

use tokio::task::AbortHandle;
use tracing::debug;

/// Sequence number attached to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides which completions may be applied
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: u64,
    applied: u64,
    in_flight: Option<AbortHandle>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any earlier one
    pub fn issue(&mut self) -> Ticket {
        self.abort_in_flight();
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Register the task serving `ticket` so it can be aborted on supersession
    ///
    /// A task for a ticket that is already stale is aborted immediately.
    pub fn attach(&mut self, ticket: Ticket, handle: AbortHandle) {
        if self.is_current(ticket) {
            self.in_flight = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// True if `ticket` is the latest issued and has not been applied yet
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued && ticket.0 > self.applied
    }

    /// Claim the right to apply a completion
    ///
    /// Returns false for stale tickets; the caller must then discard its result.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                applied = self.applied,
                "Dropping stale completion"
            );
            return false;
        }
        self.applied = ticket.0;
        self.in_flight = None;
        true
    }

    /// Make every outstanding ticket stale and abort the in-flight task
    pub fn invalidate(&mut self) {
        self.abort_in_flight();
        self.issued += 1;
    }

    /// True while a request task is still running
    pub fn is_pending(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
