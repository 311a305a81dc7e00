use core::ops::{Deref, DerefMut};

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::arbiter::BusArbiter;
use crate::factory::BusFactory;

/// RAII guard proving the local master drives the bus.
///
/// Dropping the guard releases the bus: the lines return to neutral inputs
/// and ownership goes back to [`Released`](crate::BusOwnership::Released).
/// This holds for early returns, errors and dropped futures alike.
pub struct OwnedBus<'g, 'a, M: RawMutex, F: BusFactory> {
    arbiter: &'g mut BusArbiter<'a, M, F>,
}

impl<'g, 'a, M: RawMutex, F: BusFactory> OwnedBus<'g, 'a, M, F> {
    /// Create a new guard. Only called by `BusArbiter`.
    pub(crate) fn new(arbiter: &'g mut BusArbiter<'a, M, F>) -> Self {
        Self { arbiter }
    }

    /// Returns a reference to the driven bus.
    #[inline]
    pub fn bus(&mut self) -> &mut F::Bus {
        self
    }

    /// Release the bus now instead of at the end of scope.
    pub fn release(self) {
        drop(self)
    }
}

impl<M: RawMutex, F: BusFactory> Deref for OwnedBus<'_, '_, M, F> {
    type Target = F::Bus;

    #[inline]
    fn deref(&self) -> &F::Bus {
        match self.arbiter.held_bus() {
            Some(bus) => bus,
            // The guard holds the only `&mut` to the arbiter.
            None => unreachable!(),
        }
    }
}

impl<M: RawMutex, F: BusFactory> DerefMut for OwnedBus<'_, '_, M, F> {
    #[inline]
    fn deref_mut(&mut self) -> &mut F::Bus {
        match self.arbiter.held_bus_mut() {
            Some(bus) => bus,
            None => unreachable!(),
        }
    }
}

impl<M: RawMutex, F: BusFactory> Drop for OwnedBus<'_, '_, M, F> {
    fn drop(&mut self) {
        self.arbiter.release();
    }
}
