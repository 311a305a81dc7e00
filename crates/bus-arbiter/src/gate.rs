use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;

use crate::arbiter::BusArbiter;
use crate::error::StorageStatus;
use crate::factory::BusFactory;

/// Outcome of the one-shot mount attempt made at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MediumReadiness {
    NotInitialized,
    Ready,
    /// Terminal for the process lifetime.
    FailedPermanently,
}

/// One storage-touching request from the file service.
#[allow(async_fn_in_trait)]
pub trait UnitOfWork<Bus> {
    type Error;

    /// Run against the bus while the local master owns it.
    async fn execute(&mut self, bus: &mut Bus) -> Result<(), Self::Error>;

    /// Called instead of [`execute`](Self::execute) when the gate refuses
    /// the work.
    fn reject(&mut self, status: StorageStatus);
}

/// What the gate did with a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Admission<E> {
    /// The work ran and succeeded.
    Completed,
    /// The work ran and reported a failure. The bus was still released.
    Failed(E),
    /// The work never touched the bus.
    Rejected(StorageStatus),
}

/// Decides for each unit of work whether it may reach the storage medium.
///
/// Checks run in a fixed order: readiness, then blockout, then acquisition.
/// The bus is never driven when either of the first two would make that
/// unsafe, and every acquisition is released before `admit` returns.
pub struct RequestGate<'a, M: RawMutex, F: BusFactory> {
    arbiter: BusArbiter<'a, M, F>,
    readiness: MediumReadiness,
}

impl<'a, M: RawMutex, F: BusFactory> RequestGate<'a, M, F> {
    pub fn new(arbiter: BusArbiter<'a, M, F>) -> Self {
        Self { arbiter, readiness: MediumReadiness::NotInitialized }
    }

    /// Run the startup mount check under ownership and record its result.
    ///
    /// Readiness is decided once: after `Ready` or `FailedPermanently` the
    /// check is not run again. While the bus is blocked nothing happens and
    /// `NotInitialized` is returned so the caller can wait and retry.
    pub async fn mount<W: UnitOfWork<F::Bus>>(
        &mut self,
        now: Instant,
        check: &mut W,
    ) -> MediumReadiness {
        if self.readiness != MediumReadiness::NotInitialized {
            return self.readiness;
        }

        self.arbiter.sync_sense();
        if self.arbiter.is_blocked(now) {
            return MediumReadiness::NotInitialized;
        }

        self.readiness = match self.arbiter.acquire() {
            Ok(mut owned) => match check.execute(owned.bus()).await {
                Ok(()) => MediumReadiness::Ready,
                Err(_) => MediumReadiness::FailedPermanently,
            },
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Could not drive bus for mount");
                MediumReadiness::FailedPermanently
            }
        };
        self.readiness
    }

    /// Evaluate one unit of work at `now`.
    pub async fn admit<W: UnitOfWork<F::Bus>>(
        &mut self,
        now: Instant,
        work: &mut W,
    ) -> Admission<W::Error> {
        self.arbiter.sync_sense();

        let refusal = match self.readiness {
            MediumReadiness::FailedPermanently => {
                Some(StorageStatus::StorageFailed)
            }
            // Not mounted yet; the requester may come back.
            MediumReadiness::NotInitialized => Some(StorageStatus::StorageBusy),
            MediumReadiness::Ready if self.arbiter.is_blocked(now) => {
                Some(StorageStatus::StorageBusy)
            }
            MediumReadiness::Ready => None,
        };
        if let Some(status) = refusal {
            work.reject(status);
            return Admission::Rejected(status);
        }

        let mut owned = match self.arbiter.acquire() {
            Ok(owned) => owned,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Could not drive bus");
                work.reject(StorageStatus::StorageFailed);
                return Admission::Rejected(StorageStatus::StorageFailed);
            }
        };

        let result = work.execute(owned.bus()).await;
        owned.release();

        match result {
            Ok(()) => Admission::Completed,
            Err(e) => Admission::Failed(e),
        }
    }

    /// Whether a request arriving at `now` would be refused for contention.
    pub fn is_blocked(&mut self, now: Instant) -> bool {
        self.arbiter.sync_sense();
        self.arbiter.is_blocked(now)
    }

    pub fn readiness(&self) -> MediumReadiness {
        self.readiness
    }

    pub fn arbiter(&self) -> &BusArbiter<'a, M, F> {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut BusArbiter<'a, M, F> {
        &mut self.arbiter
    }
}
