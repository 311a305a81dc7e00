use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Snapshot of how many times the local master has taken the bus.
///
/// Taken by the edge handler before it starts waiting for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldEpoch(u32);

/// Mailbox between the sense-line edge handler and the arbiter.
///
/// The edge side only ever posts a timestamp; it never touches ownership or
/// the deadline. The arbiter drains the mailbox from the control flow before
/// each decision. Only the most recent edge is kept, which is the one that
/// arms the latest deadline.
///
/// The handler usually runs some time after the edge, possibly after the
/// local master has already released again. An edge is therefore only
/// posted if no local hold began since the handler's [`HoldEpoch`] was
/// taken.
pub struct ActivitySense<M: RawMutex> {
    local_hold: AtomicBool,
    holds: AtomicU32,
    latest: Signal<M, Instant>,
}

impl<M: RawMutex> ActivitySense<M> {
    pub const fn new() -> Self {
        Self {
            local_hold: AtomicBool::new(false),
            holds: AtomicU32::new(0),
            latest: Signal::new(),
        }
    }

    /// Take before waiting for the next edge.
    pub fn epoch(&self) -> HoldEpoch {
        HoldEpoch(self.holds.load(Ordering::Acquire))
    }

    /// Record an edge seen on the sense line at `at`.
    ///
    /// Dropped while the local master drives the bus, or if it took the bus
    /// at any point since `since`: the edge may then be our own chip-select.
    /// Returns whether the edge was posted.
    pub fn on_edge(&self, since: HoldEpoch, at: Instant) -> bool {
        if self.local_hold.load(Ordering::Acquire) || self.epoch() != since {
            return false;
        }
        self.latest.signal(at);
        true
    }

    /// Whether the local master currently holds the bus.
    pub fn is_local_hold(&self) -> bool {
        self.local_hold.load(Ordering::Acquire)
    }

    pub(crate) fn set_local_hold(&self, held: bool) {
        if held {
            self.holds.fetch_add(1, Ordering::AcqRel);
        }
        self.local_hold.store(held, Ordering::Release);
    }

    pub(crate) fn take(&self) -> Option<Instant> {
        self.latest.try_take()
    }
}

impl<M: RawMutex> Default for ActivitySense<M> {
    fn default() -> Self {
        Self::new()
    }
}
