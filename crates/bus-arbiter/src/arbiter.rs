use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;

use crate::config::{ArbiterConfig, BlockoutSource};
use crate::error::BusError;
use crate::factory::BusFactory;
use crate::handle::OwnedBus;
use crate::sense::ActivitySense;

/// Who currently drives the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusOwnership {
    /// All local lines are neutral inputs.
    Released,
    /// The local master drives the bus.
    HeldByLocal,
}

/// Phase state machine for bus ownership.
enum Phase<F: BusFactory> {
    /// Lines are neutral; resources are available.
    Released(F::Resources),
    /// Lines are driven by the local master.
    Held(F::Bus, F::Destructor),
    /// Unrecoverable error state (should not normally be reached).
    Poisoned,
}

/// Serializes all local access to the bus shared with the other master.
///
/// The arbiter owns the ownership phase and the blockout deadline and is
/// meant to live inside a single control flow. Everything that mutates takes
/// `&mut self`; the only input from outside that flow is the
/// [`ActivitySense`] mailbox, drained by [`sync_sense`](Self::sync_sense).
pub struct BusArbiter<'a, M: RawMutex, F: BusFactory> {
    phase: Phase<F>,
    deadline: Option<Instant>,
    config: ArbiterConfig,
    sense: &'a ActivitySense<M>,
}

impl<'a, M: RawMutex, F: BusFactory> BusArbiter<'a, M, F> {
    /// Create an arbiter that starts with the bus released and no deadline.
    pub fn new(
        resources: F::Resources,
        sense: &'a ActivitySense<M>,
        config: ArbiterConfig,
    ) -> Self {
        sense.set_local_hold(false);
        Self {
            phase: Phase::Released(resources),
            deadline: None,
            config,
            sense,
        }
    }

    /// Drive the bus.
    ///
    /// Only legal from [`BusOwnership::Released`]. The returned guard releases
    /// the bus when dropped, so every exit path floats the lines again.
    pub fn acquire(
        &mut self,
    ) -> Result<OwnedBus<'_, 'a, M, F>, BusError<F::Error>> {
        match &self.phase {
            Phase::Released(_) => {}
            Phase::Held(..) => return Err(BusError::AlreadyHeld),
            Phase::Poisoned => return Err(BusError::Poisoned),
        }

        // Take resources out, replacing with Poisoned temporarily.
        let resources =
            match core::mem::replace(&mut self.phase, Phase::Poisoned) {
                Phase::Released(r) => r,
                _ => unreachable!(),
            };

        // Edges from here on are our own chip-select.
        self.sense.set_local_hold(true);
        match F::create(resources) {
            Ok((bus, destructor)) => {
                self.phase = Phase::Held(bus, destructor);
                Ok(OwnedBus::new(self))
            }
            Err((err, resources)) => {
                self.phase = Phase::Released(resources);
                self.sense.set_local_hold(false);
                Err(BusError::FactoryError(err))
            }
        }
    }

    /// Float every line and mark the bus released.
    ///
    /// A no-op when the bus is already released.
    pub fn release(&mut self) {
        if !matches!(self.phase, Phase::Held(..)) {
            return;
        }

        let (bus, destructor) =
            match core::mem::replace(&mut self.phase, Phase::Poisoned) {
                Phase::Held(bus, destructor) => (bus, destructor),
                _ => unreachable!(),
            };

        // The bus peripheral must be gone before the pins are reclaimed.
        drop(bus);
        self.phase = Phase::Released(F::recover(destructor));
        self.sense.set_local_hold(false);
    }

    /// Arm the blockout because the other master was seen at `at`.
    ///
    /// Ignored while the local master holds the bus. The deadline only ever
    /// moves forward.
    pub fn note_external_activity(&mut self, at: Instant) {
        if self.ownership() == BusOwnership::HeldByLocal {
            return;
        }
        let until = at
            .checked_add(self.config.blockout_window)
            .unwrap_or(Instant::MAX);
        self.deadline = Some(match self.deadline {
            Some(current) if current > until => current,
            _ => until,
        });
    }

    /// Treat boot time as external activity so the first acquisition waits
    /// out one full window.
    pub fn arm_preroll(&mut self, boot: Instant) {
        self.note_external_activity(boot);
    }

    /// Consume the edge posted by the sense line, if any.
    ///
    /// With [`BlockoutSource::PrerollOnly`] the edge is discarded.
    pub fn sync_sense(&mut self) {
        if let Some(at) = self.sense.take() {
            if self.config.source == BlockoutSource::SenseLine {
                self.note_external_activity(at);
            }
        }
    }

    /// Whether the other master is probably still using the bus at `now`.
    pub fn is_blocked(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// The instant before which no acquisition is attempted, if armed.
    pub fn blockout_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn ownership(&self) -> BusOwnership {
        match self.phase {
            Phase::Held(..) => BusOwnership::HeldByLocal,
            _ => BusOwnership::Released,
        }
    }

    /// Returns `true` if the arbiter lost its resources.
    pub fn is_poisoned(&self) -> bool {
        matches!(self.phase, Phase::Poisoned)
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub(crate) fn held_bus(&self) -> Option<&F::Bus> {
        match &self.phase {
            Phase::Held(bus, _) => Some(bus),
            _ => None,
        }
    }

    pub(crate) fn held_bus_mut(&mut self) -> Option<&mut F::Bus> {
        match &mut self.phase {
            Phase::Held(bus, _) => Some(bus),
            _ => None,
        }
    }
}
